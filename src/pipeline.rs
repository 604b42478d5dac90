//! Per-file planning: probe, decide, assemble the ffmpeg command.

use crate::config::{Config, EncoderConfig};
use crate::policy::{vaapi, HevcPolicy};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use streamplan_av::{remux, FfmpegArgs, MetadataProbe, SharedInfo, StreamMapper};

/// Where planned commands write their output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputTarget {
    /// Next to the input, as `<stem>.hevc.<ext>`.
    #[default]
    Alongside,
    /// In the given directory, keeping the input file name.
    Directory(PathBuf),
    /// Discard the output.
    Null,
}

impl OutputTarget {
    /// Output path for `input`, or `None` when discarding.
    pub fn resolve(&self, input: &Path) -> Option<PathBuf> {
        match self {
            OutputTarget::Alongside => {
                let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                let name = match input.extension() {
                    Some(ext) => format!("{}.hevc.{}", stem, ext.to_string_lossy()),
                    None => format!("{}.hevc", stem),
                };
                Some(input.with_file_name(name))
            }
            OutputTarget::Directory(dir) => input.file_name().map(|name| dir.join(name)),
            OutputTarget::Null => None,
        }
    }
}

/// Planned work for one file.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub file_in: PathBuf,
    /// Final output path; rewritten when a destination container is forced.
    pub file_out: Option<PathBuf>,
    /// `[ffmpeg, args...]`, empty when no stream needs processing.
    pub command: Vec<String>,
}

impl Plan {
    pub fn needs_processing(&self) -> bool {
        !self.command.is_empty()
    }
}

/// Plans ffmpeg commands for files under one configuration.
pub struct Pipeline {
    encoder: EncoderConfig,
    probe: MetadataProbe,
    ffmpeg: PathBuf,
    dri_dir: PathBuf,
}

impl Pipeline {
    pub fn new(encoder: EncoderConfig, probe: MetadataProbe, ffmpeg: PathBuf) -> Self {
        Self {
            encoder,
            probe,
            ffmpeg,
            dri_dir: PathBuf::from(vaapi::DRI_DIR),
        }
    }

    /// Build a pipeline, locating ffprobe and ffmpeg from configuration or
    /// `PATH`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let probe = build_probe(config)?;
        let ffmpeg = streamplan_av::get_tool_path("ffmpeg", config.tools.ffmpeg_path.as_deref())?;
        Ok(Self::new(config.encoder.clone(), probe, ffmpeg))
    }

    /// Look for VAAPI render nodes in `dir` instead of `/dev/dri`.
    pub fn with_dri_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dri_dir = dir.into();
        self
    }

    /// File test: whether `path` has streams that need processing.
    ///
    /// Returns `false` when the file cannot be probed.
    pub fn test_file(&mut self, path: &Path, shared: &mut SharedInfo) -> Result<bool> {
        if !self.probe.init(path, shared) {
            return Ok(false);
        }

        let mut mapper = StreamMapper::new(HevcPolicy::from_config(&self.encoder), HevcPolicy::PROCESSING);
        let needed = mapper.map_streams(self.probe.result())?;

        if needed {
            tracing::debug!("File {:?} should be added to task list. Probe found streams require processing.", path);
        } else {
            tracing::debug!("File {:?} does not contain streams require processing.", path);
        }
        Ok(needed)
    }

    /// Worker: build the ffmpeg command for `input`.
    ///
    /// Returns `None` when the file cannot be probed.
    pub fn plan(
        &mut self,
        input: &Path,
        target: &OutputTarget,
        shared: &mut SharedInfo,
    ) -> Result<Option<Plan>> {
        if !self.probe.init(input, shared) {
            return Ok(None);
        }

        let mut plan = Plan {
            file_in: input.to_path_buf(),
            file_out: target.resolve(input),
            command: Vec::new(),
        };

        let mut mapper = StreamMapper::new(HevcPolicy::from_config(&self.encoder), HevcPolicy::PROCESSING);
        if !mapper.map_streams(self.probe.result())? {
            return Ok(Some(plan));
        }

        let mut args = FfmpegArgs::new();
        args.set_input_file(input)?;

        if !self.encoder.keep_container {
            let container = self.encoder.container()?;
            plan.file_out = plan
                .file_out
                .map(|out| remux::with_container(&out, container.extension()));
        }

        if self.encoder.is_vaapi() {
            vaapi::apply_default_args(&mut args, &self.dri_dir, self.encoder.hw_decoding)?;
        }

        if self.encoder.advanced {
            let main_options = self.encoder.main_option_tokens();
            if !main_options.is_empty() {
                args.replace_main_options(main_options);
            }
            let advanced_options = self.encoder.advanced_option_tokens();
            if !advanced_options.is_empty() {
                args.replace_advanced_options(advanced_options);
            }
        } else {
            let queue_size = self.encoder.max_muxing_queue_size.to_string();
            args.set_advanced_options(&[], &[("-max_muxing_queue_size", queue_size.as_str())]);
        }

        match &plan.file_out {
            Some(out) => args.set_output_file(out)?,
            None => args.set_null_output(),
        }

        args.set_directives(mapper.into_directives());

        plan.command = std::iter::once(self.ffmpeg.to_string_lossy().to_string())
            .chain(args.build()?)
            .collect();

        tracing::info!("Planned {:?}: {}", input, plan.command.join(" "));
        Ok(Some(plan))
    }

    /// Plan every file, each with its own shared context.
    ///
    /// Files that cannot be probed or planned are logged and skipped.
    pub fn plan_batch(&mut self, inputs: &[PathBuf], target: &OutputTarget) -> Vec<Plan> {
        let mut plans = Vec::with_capacity(inputs.len());

        for input in inputs {
            let mut shared = SharedInfo::new();

            if let Err(e) = self.test_file(input, &mut shared) {
                tracing::warn!("Skipping {:?}: {:#}", input, e);
                continue;
            }
            // The file test leaves no handoff when ffprobe failed.
            if shared.ffprobe().is_none() {
                tracing::warn!("Skipping {:?}: file could not be probed", input);
                continue;
            }

            let result = self
                .plan(input, target, &mut shared)
                .with_context(|| format!("Failed to plan {:?}", input));

            match result {
                Ok(Some(plan)) => plans.push(plan),
                Ok(None) => tracing::warn!("Skipping {:?}: file could not be probed", input),
                Err(e) => tracing::warn!("Skipping {:?}: {:#}", input, e),
            }
        }

        plans
    }
}

/// Metadata probe for the configured tools and content types.
pub fn build_probe(config: &Config) -> Result<MetadataProbe> {
    let probe = MetadataProbe::discover(
        config.tools.ffprobe_path.as_deref(),
        config.probe.allowed_mimetypes.clone(),
        config.probe.mime_table(),
    )?;
    Ok(probe)
}
