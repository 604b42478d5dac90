//! Assembly of the final ffmpeg argument list.

use super::engine::MappingDirectives;
use crate::remux;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Platform discard target for validation-only runs.
#[cfg(windows)]
pub const NULL_OUTPUT: &str = "NUL";
/// Platform discard target for validation-only runs.
#[cfg(not(windows))]
pub const NULL_OUTPUT: &str = "-";

/// Independently editable option groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionGroup {
    /// Global flags that follow the program name.
    Generic,
    /// Input-related flags placed before `-i`.
    Main,
    /// Behavioral flags placed after the input.
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Output {
    File(PathBuf),
    Null,
}

/// Builder for an ffmpeg invocation.
///
/// Tokens are emitted in a fixed order: generic options, main options,
/// `-i <input>`, advanced options, selection directives, codec directives,
/// then the output.
#[derive(Debug, Clone)]
pub struct FfmpegArgs {
    generic: Vec<String>,
    main: Vec<String>,
    advanced: Vec<String>,
    directives: MappingDirectives,
    input: Option<PathBuf>,
    output: Option<Output>,
}

impl Default for FfmpegArgs {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegArgs {
    /// Builder with the default generic and advanced options.
    pub fn new() -> Self {
        Self {
            generic: strings(["-hide_banner", "-loglevel", "info"]),
            main: Vec::new(),
            advanced: strings(["-strict", "-2", "-max_muxing_queue_size", "4096"]),
            directives: MappingDirectives::default(),
            input: None,
            output: None,
        }
    }

    /// Tokens of one option group.
    pub fn options(&self, group: OptionGroup) -> &[String] {
        match group {
            OptionGroup::Generic => &self.generic,
            OptionGroup::Main => &self.main,
            OptionGroup::Advanced => &self.advanced,
        }
    }

    fn options_mut(&mut self, group: OptionGroup) -> &mut Vec<String> {
        match group {
            OptionGroup::Generic => &mut self.generic,
            OptionGroup::Main => &mut self.main,
            OptionGroup::Advanced => &mut self.advanced,
        }
    }

    /// Merge tokens into a group.
    ///
    /// A positional token already present is moved to the end; otherwise it
    /// is appended. A named flag already present has the token after it
    /// replaced in place; otherwise flag and value are appended as a pair.
    pub fn apply_overrides(&mut self, group: OptionGroup, positional: &[&str], named: &[(&str, &str)]) {
        let options = self.options_mut(group);

        for &token in positional {
            options.retain(|t| t != token);
            options.push(token.to_string());
        }

        for &(flag, value) in named {
            match options.iter().position(|t| t == flag) {
                Some(pos) if pos + 1 < options.len() => options[pos + 1] = value.to_string(),
                Some(_) => options.push(value.to_string()),
                None => options.extend([flag.to_string(), value.to_string()]),
            }
        }
    }

    /// Merge tokens into the generic group.
    pub fn set_generic_options(&mut self, positional: &[&str], named: &[(&str, &str)]) {
        self.apply_overrides(OptionGroup::Generic, positional, named);
    }

    /// Merge tokens into the main group.
    pub fn set_main_options(&mut self, positional: &[&str], named: &[(&str, &str)]) {
        self.apply_overrides(OptionGroup::Main, positional, named);
    }

    /// Merge tokens into the advanced group.
    pub fn set_advanced_options(&mut self, positional: &[&str], named: &[(&str, &str)]) {
        self.apply_overrides(OptionGroup::Advanced, positional, named);
    }

    /// Replace a group wholesale.
    pub fn replace_options(&mut self, group: OptionGroup, tokens: Vec<String>) {
        *self.options_mut(group) = tokens;
    }

    pub fn replace_main_options(&mut self, tokens: Vec<String>) {
        self.replace_options(OptionGroup::Main, tokens);
    }

    pub fn replace_advanced_options(&mut self, tokens: Vec<String>) {
        self.replace_options(OptionGroup::Advanced, tokens);
    }

    /// Set the selection and codec directives from a mapping pass.
    pub fn set_directives(&mut self, directives: MappingDirectives) {
        self.directives = directives;
    }

    /// Set the input file, made absolute.
    pub fn set_input_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.input = Some(std::path::absolute(path.as_ref())?);
        Ok(())
    }

    /// Set the output file, made absolute.
    pub fn set_output_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.output = Some(Output::File(std::path::absolute(path.as_ref())?));
        Ok(())
    }

    /// Discard the output (`-f null` to the platform null target).
    pub fn set_null_output(&mut self) {
        self.output = Some(Output::Null);
        self.set_main_options(&[], &[("-f", "null")]);
    }

    pub fn input_file(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    /// The output file, or `None` when unset or discarding.
    pub fn output_file(&self) -> Option<&Path> {
        match &self.output {
            Some(Output::File(path)) => Some(path),
            _ => None,
        }
    }

    /// Whether writing to the input's container would need a remux.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no input file is set.
    pub fn remux_required(&self, container_extension: &str) -> Result<bool> {
        let input = self
            .input
            .as_deref()
            .ok_or_else(|| Error::configuration("Input file not yet set"))?;
        Ok(remux::remux_required(input, container_extension))
    }

    /// Assemble the full argument list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the input or output is unset.
    pub fn build(&self) -> Result<Vec<String>> {
        let mut args = Vec::with_capacity(
            self.generic.len()
                + self.main.len()
                + self.advanced.len()
                + self.directives.selection.len()
                + self.directives.codec.len()
                + 4,
        );

        args.extend(self.generic.iter().cloned());
        args.extend(self.main.iter().cloned());

        let input = self
            .input
            .as_deref()
            .ok_or_else(|| Error::configuration("Input file has not been set"))?;
        args.push("-i".to_string());
        args.push(input.to_string_lossy().to_string());

        args.extend(self.advanced.iter().cloned());
        args.extend(self.directives.selection.iter().cloned());
        args.extend(self.directives.codec.iter().cloned());

        match &self.output {
            Some(Output::Null) => args.push(NULL_OUTPUT.to_string()),
            Some(Output::File(path)) => {
                args.push("-y".to_string());
                args.push(path.to_string_lossy().to_string());
            }
            None => return Err(Error::configuration("Output file has not been set")),
        }

        Ok(args)
    }
}

fn strings<const N: usize>(tokens: [&str; N]) -> Vec<String> {
    tokens.iter().map(|s| s.to_string()).collect()
}
