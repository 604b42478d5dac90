mod cli;

use streamplan::{
    config,
    pipeline::{self, OutputTarget, Pipeline},
    policy::CompatReport,
};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use streamplan_av::{has_metadata, ProbeResult};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "streamplan=debug,streamplan_av=debug".to_string()
        } else {
            "streamplan=info,streamplan_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Probe { file, json } => probe_file(&file, config_path, json),
        Commands::Plan {
            files,
            output,
            null,
            json,
        } => {
            let target = match (output, null) {
                (_, true) => OutputTarget::Null,
                (Some(dir), false) => OutputTarget::Directory(dir),
                (None, false) => OutputTarget::Alongside,
            };
            plan_files(&files, config_path, &target, json)
        }
        Commands::Search { file, key, value } => search_file(&file, config_path, &key, &value),
        Commands::Compat { file } => compat_file(&file, config_path),
        Commands::CheckTools => check_tools(config_path),
        Commands::Validate {
            config: validate_path,
        } => {
            let path = validate_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("streamplan {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Probe `file` with the configured probe, failing if it is rejected.
fn load_probe(file: &Path, config_path: Option<&Path>) -> Result<ProbeResult> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let mut probe = pipeline::build_probe(&config)?;

    match probe.probe(file) {
        Some(result) => Ok(result.clone()),
        None => anyhow::bail!(
            "Unable to probe {:?} (not one of [{}] or unreadable by ffprobe)",
            file,
            probe.allowed().join(", ")
        ),
    }
}

fn probe_file(file: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    let result = load_probe(file, config_path)?;

    if json {
        let json_str = serde_json::to_string_pretty(&result)?;
        println!("{}", json_str);
        return Ok(());
    }

    println!("File: {}", result.filename().unwrap_or_default());
    if let Some(format) = result.format.get("format_name").and_then(|v| v.as_str()) {
        println!("Format: {}", format);
    }
    if let Some(duration) = result.format.get("duration").and_then(|v| v.as_str()) {
        println!("Duration: {}s", duration);
    }

    println!("\nStreams: {}", result.streams.len());
    for (i, stream) in result.streams.iter().enumerate() {
        print!(
            "  [{}] {} {}",
            i,
            stream.codec_type.as_deref().unwrap_or("unknown"),
            stream.codec_name.as_deref().unwrap_or("unknown")
        );
        if let Some(ref pix_fmt) = stream.pix_fmt {
            print!(" {}", pix_fmt);
        }
        if let Some(lang) = stream.tags.as_ref().and_then(|t| t.get("language")) {
            print!(" ({})", lang);
        }
        println!();
    }

    Ok(())
}

fn plan_files(
    files: &[PathBuf],
    config_path: Option<&Path>,
    target: &OutputTarget,
    json: bool,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let mut pipeline = Pipeline::from_config(&config)?;

    tracing::info!("Planning {} file(s)", files.len());
    let plans = pipeline.plan_batch(files, target);

    if json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
        return Ok(());
    }

    for plan in &plans {
        println!("File: {}", plan.file_in.display());
        if plan.needs_processing() {
            if let Some(ref out) = plan.file_out {
                println!("Output: {}", out.display());
            }
            println!("Command: {}", plan.command.join(" "));
        } else {
            println!("No processing required");
        }
        println!();
    }

    let skipped = files.len() - plans.len();
    if skipped > 0 {
        println!("{} file(s) skipped", skipped);
    }

    Ok(())
}

fn search_file(file: &Path, config_path: Option<&Path>, key: &str, value: &str) -> Result<()> {
    let result = load_probe(file, config_path)?;

    if has_metadata(&result, key, value) {
        println!("File contains metadata '{}': '{}'", key, value);
    } else {
        println!("File does not contain metadata '{}': '{}'", key, value);
    }

    Ok(())
}

fn compat_file(file: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let mut probe = pipeline::build_probe(&config)?;

    // Files that cannot be probed are blocked rather than failed.
    let Some(result) = probe.probe(file) else {
        tracing::debug!("Probe data failed for {:?}", file);
        println!("Skip: probe failed");
        return Ok(());
    };

    let report = CompatReport::from_probe(result);
    println!("HEVC: {}", report.is_hevc);
    println!("H.264: {}", report.is_h264);
    println!("10-bit: {}", report.is_ten_bit);

    if report.should_skip() {
        println!("Skip: already playable without re-encoding");
    } else {
        println!("Queue: file may be processed");
    }

    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let tools = streamplan_av::check_tools(
        config.tools.ffmpeg_path.as_deref(),
        config.tools.ffprobe_path.as_deref(),
    );

    println!("{:<8} {:<8} {}", "TOOL", "STATUS", "LOCATION");
    for tool in &tools {
        let status = if tool.available { "ok" } else { "missing" };
        let location = tool
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<8} {:<8} {}", tool.name, status, location);
        if let Some(ref version) = tool.version {
            println!("         {}", version);
        }
    }

    let missing: Vec<&str> = tools
        .iter()
        .filter(|t| !t.available)
        .map(|t| t.name.as_str())
        .collect();
    if !missing.is_empty() {
        println!("\nNot usable: {}", missing.join(", "));
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    let encoder = &config.encoder;
    println!("  Allowed types: {}", config.probe.allowed_mimetypes.join(", "));
    println!("  Encoder: {}", encoder.encoder);
    println!("  Advanced mode: {}", encoder.advanced);
    println!("  HW decoding: {}", encoder.hw_decoding);
    if encoder.keep_container {
        println!("  Container: keep");
    } else {
        println!("  Container: {}", encoder.dest_container);
    }

    Ok(())
}
