mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Accepted range for `encoder.max_muxing_queue_size`.
pub const MUXING_QUEUE_RANGE: std::ops::RangeInclusive<u32> = 1024..=10240;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./streamplan.toml",
        "./config.toml",
        "~/.config/streamplan/config.toml",
        "/etc/streamplan/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.probe.allowed_mimetypes.is_empty() {
        anyhow::bail!("probe.allowed_mimetypes cannot be empty");
    }

    let encoder = &config.encoder;
    if encoder.encoder.trim().is_empty() {
        anyhow::bail!("encoder.encoder cannot be empty");
    }

    if !MUXING_QUEUE_RANGE.contains(&encoder.max_muxing_queue_size) {
        anyhow::bail!(
            "encoder.max_muxing_queue_size must be between {} and {}, got {}",
            MUXING_QUEUE_RANGE.start(),
            MUXING_QUEUE_RANGE.end(),
            encoder.max_muxing_queue_size
        );
    }

    encoder
        .container()
        .with_context(|| format!("Invalid encoder.dest_container: {}", encoder.dest_container))?;

    for path in [&config.tools.ffmpeg_path, &config.tools.ffprobe_path]
        .into_iter()
        .flatten()
    {
        if !path.exists() {
            tracing::warn!("Configured tool path does not exist: {:?}", path);
        }
    }

    Ok(())
}
