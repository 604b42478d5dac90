use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "streamplan")]
#[command(author, version, about = "Plan ffmpeg HEVC transcodes from ffprobe metadata")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe a media file and display its streams
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Plan the ffmpeg command for one or more files
    Plan {
        /// Files to plan
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory to write outputs to (default: next to the input)
        #[arg(short, long, conflicts_with = "null")]
        output: Option<PathBuf>,

        /// Discard the output (validation run)
        #[arg(long)]
        null: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search a file's metadata for a key/value match
    Search {
        /// File to search
        #[arg(required = true)]
        file: PathBuf,

        /// Key (matched as a substring of lowercased keys)
        #[arg(short, long)]
        key: String,

        /// Value (matched as a substring)
        #[arg(long)]
        value: String,
    },

    /// Check whether a file would be skipped for playback compatibility
    Compat {
        /// File to check
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
