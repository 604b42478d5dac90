//! Builder for executing external tool commands.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::{Error, Result};

/// Output captured from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status.
    pub status: ExitStatus,
    /// Standard output followed by standard error, decoded as UTF-8.
    pub output: String,
}

impl ToolOutput {
    /// Whether the process exited successfully.
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// A builder for constructing and executing external tool invocations.
///
/// Execution is blocking and has no deadline; callers that need bounded
/// latency must run it on a thread they can abandon.
///
/// # Example
///
/// ```no_run
/// use streamplan_av::ToolCommand;
///
/// let output = ToolCommand::new("ffprobe")
///     .arg("-loglevel").arg("quiet")
///     .arg("-print_format").arg("json")
///     .arg("-show_streams")
///     .arg("/path/to/video.mkv")
///     .execute()?;
/// println!("{}", output.output);
/// # Ok::<(), streamplan_av::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// The program this command will run.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The arguments accumulated so far.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Short tool name used in error messages.
    fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Execute the command, capturing stdout and stderr as one text blob.
    ///
    /// A non-zero exit status is not an error here; inspect
    /// [`ToolOutput::status`].
    ///
    /// # Errors
    ///
    /// - [`Error::ToolNotFound`] if the program does not exist.
    /// - [`Error::ToolFailed`] if spawning or waiting on the process fails.
    /// - [`Error::ParseError`] if the captured output is not valid UTF-8.
    pub fn execute(&self) -> Result<ToolOutput> {
        let tool = self.tool_name();

        tracing::trace!("Executing {:?} {:?}", self.program, self.args);

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::tool_not_found(&tool)
                } else {
                    Error::tool_failed(&tool, format!("failed to spawn: {e}"))
                }
            })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        let text = String::from_utf8(combined)
            .map_err(|e| Error::parse_error(&tool, format!("Invalid UTF-8: {e}")))?;

        Ok(ToolOutput {
            status: output.status,
            output: text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_args() {
        let mut cmd = ToolCommand::new("ffprobe");
        cmd.arg("-show_format").args(["-print_format", "json"]);
        assert_eq!(cmd.program(), Path::new("ffprobe"));
        assert_eq!(cmd.get_args(), ["-show_format", "-print_format", "json"]);
    }

    #[test]
    fn execute_nonexistent_tool() {
        let result = ToolCommand::new("nonexistent_tool_xyz_12345").execute();
        assert!(matches!(result, Err(Error::ToolNotFound { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn execute_captures_stdout_and_stderr() {
        let output = ToolCommand::new("sh")
            .arg("-c")
            .arg("printf out; printf err 1>&2; exit 3")
            .execute()
            .unwrap();
        assert!(!output.success());
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(output.output, "outerr");
    }
}
