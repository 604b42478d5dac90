//! Container formats and the remux check.

use crate::Error;
use std::path::{Path, PathBuf};

/// Supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// Matroska container
    Mkv,
    /// MPEG-4 Part 14 container
    Mp4,
    /// MPEG transport stream
    Ts,
    /// QuickTime container
    Mov,
    /// WebM container
    Webm,
    /// AVI container
    Avi,
    /// M2TS (Blu-ray) container
    M2ts,
}

impl Container {
    /// File extension for this container, without a dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Container::Mkv => "mkv",
            Container::Mp4 => "mp4",
            Container::Ts => "ts",
            Container::Mov => "mov",
            Container::Webm => "webm",
            Container::Avi => "avi",
            Container::M2ts => "m2ts",
        }
    }
}

impl std::str::FromStr for Container {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "mkv" | "matroska" => Ok(Container::Mkv),
            "mp4" | "m4v" => Ok(Container::Mp4),
            "ts" | "mpegts" => Ok(Container::Ts),
            "mov" | "quicktime" => Ok(Container::Mov),
            "webm" => Ok(Container::Webm),
            "avi" => Ok(Container::Avi),
            "m2ts" => Ok(Container::M2ts),
            _ => Err(Error::InvalidInput(format!(
                "Unknown container format: {}",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Whether writing `input` into a container with extension `ext` needs a
/// remux.
///
/// Leading dots are ignored on both sides; the comparison is otherwise
/// exact, so `mkv` and `MKV` differ.
pub fn remux_required(input: &Path, ext: &str) -> bool {
    let current = input
        .extension()
        .map(|e| e.to_string_lossy())
        .unwrap_or_default();
    current.trim_start_matches('.') != ext.trim_start_matches('.')
}

/// `path` with its extension replaced by `ext`.
pub fn with_container(path: &Path, ext: &str) -> PathBuf {
    path.with_extension(ext.trim_start_matches('.'))
}
