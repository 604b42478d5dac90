//! External tool detection and management.

use crate::command::ToolCommand;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Argument that makes ffmpeg and ffprobe print their version.
const VERSION_ARG: &str = "-version";

/// Availability of one external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    /// Whether the tool ran and reported a version.
    pub available: bool,
    /// First line of the version output.
    pub version: Option<String>,
    /// Resolved executable, if one was found.
    pub path: Option<PathBuf>,
}

/// Resolve `name` (configured path first, then `PATH`) and run it with
/// `version_arg`.
///
/// # Example
///
/// ```no_run
/// use streamplan_av::check_tool;
///
/// let info = check_tool("ffprobe", "-version", None);
/// if info.available {
///     println!("ffprobe version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str, version_arg: &str, configured: Option<&Path>) -> ToolInfo {
    let path = match get_tool_path(name, configured) {
        Ok(path) => path,
        Err(_) => {
            return ToolInfo {
                name: name.to_string(),
                available: false,
                version: None,
                path: None,
            }
        }
    };

    let output = ToolCommand::new(&path).arg(version_arg).execute();
    let version = match output {
        Ok(out) if out.success() => out.output.lines().next().map(str::to_string),
        Ok(out) => {
            tracing::debug!("{} exited with {} for {}", name, out.status, version_arg);
            None
        }
        Err(e) => {
            tracing::debug!("Unable to run {} at {:?}: {}", name, path, e);
            None
        }
    };

    ToolInfo {
        name: name.to_string(),
        available: version.is_some(),
        version,
        path: Some(path),
    }
}

/// Check ffmpeg and ffprobe, honoring configured paths.
pub fn check_tools(ffmpeg: Option<&Path>, ffprobe: Option<&Path>) -> Vec<ToolInfo> {
    [("ffmpeg", ffmpeg), ("ffprobe", ffprobe)]
        .into_iter()
        .map(|(name, configured)| check_tool(name, VERSION_ARG, configured))
        .collect()
}

/// Require that a tool is available on `PATH`, returning its path.
///
/// # Errors
///
/// Returns [`Error::ToolNotFound`] if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        tracing::debug!(
            "Configured path for {} does not exist, searching PATH: {:?}",
            name,
            path
        );
    }

    require_tool(name)
}
