//! FFprobe invocation and output parsing.

use super::types::ProbeResult;
use crate::command::ToolCommand;
use crate::{Error, Result};
use std::path::Path;

const TOOL: &str = "ffprobe";

/// Arguments requesting a quiet JSON report of format, streams and errors.
const PROBE_ARGS: &[&str] = &[
    "-loglevel",
    "quiet",
    "-print_format",
    "json",
    "-show_format",
    "-show_streams",
    "-show_error",
];

/// Build the ffprobe command for a file.
pub fn ffprobe_command(ffprobe: &Path, path: &Path) -> ToolCommand {
    let mut cmd = ToolCommand::new(ffprobe);
    cmd.args(PROBE_ARGS.iter().copied())
        .arg(path.to_string_lossy().to_string());
    cmd
}

/// Probe a media file with the ffprobe binary at `ffprobe`.
///
/// # Errors
///
/// Any failure to run ffprobe, an error exit status, an error reported in the
/// output, empty output or malformed JSON.
pub fn probe_with_ffprobe(ffprobe: &Path, path: &Path) -> Result<ProbeResult> {
    let output = ffprobe_command(ffprobe, path).execute()?;

    if !output.success() {
        return Err(Error::tool_failed(
            TOOL,
            format!("exited with status {}: {}", output.status, output.output.trim()),
        ));
    }

    parse_ffprobe_output(&output.output)
}

/// Parse the raw text printed by ffprobe.
///
/// Any occurrence of `error` in the raw text fails the probe, including one
/// inside a file or tag name.
pub fn parse_ffprobe_output(raw: &str) -> Result<ProbeResult> {
    if raw.contains("error") {
        return Err(Error::tool_failed(TOOL, raw.trim().to_string()));
    }
    if raw.trim().is_empty() {
        return Err(Error::tool_failed(TOOL, "No info found"));
    }

    serde_json::from_str(raw).map_err(|e| Error::parse_error(TOOL, e.to_string()))
}
