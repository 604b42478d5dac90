use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use streamplan_av::{Container, MimeTable};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub encoder: EncoderConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    /// Content-type categories to accept (`video`, `audio`, `image`, ...)
    #[serde(default = "default_allowed_mimetypes")]
    pub allowed_mimetypes: Vec<String>,

    /// Extra extension to content-type mappings, e.g. `ts = "video/mp2t"`
    #[serde(default)]
    pub mimetype_overrides: BTreeMap<String, String>,
}

fn default_allowed_mimetypes() -> Vec<String> {
    vec!["video".to_string()]
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            allowed_mimetypes: default_allowed_mimetypes(),
            mimetype_overrides: BTreeMap::new(),
        }
    }
}

impl ProbeConfig {
    /// Built-in content-type table extended with the configured overrides.
    pub fn mime_table(&self) -> MimeTable {
        MimeTable::new().with_overrides(&self.mimetype_overrides)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncoderConfig {
    /// ffmpeg video encoder, e.g. `hevc_vaapi` or `libx265`
    #[serde(default = "default_encoder")]
    pub encoder: String,

    /// Write your own ffmpeg options instead of the generated ones
    #[serde(default)]
    pub advanced: bool,

    /// Enable VAAPI hardware decoding (only for `*_vaapi` encoders)
    #[serde(default)]
    pub hw_decoding: bool,

    /// Max input stream packet buffer (ignored in advanced mode)
    #[serde(default = "default_max_muxing_queue_size")]
    pub max_muxing_queue_size: u32,

    /// Replaces the main options in advanced mode when non-empty
    #[serde(default)]
    pub main_options: String,

    /// Replaces the advanced options in advanced mode when non-empty
    #[serde(default = "default_advanced_options")]
    pub advanced_options: String,

    /// Appended to the video codec tokens in advanced mode
    #[serde(default)]
    pub custom_options: String,

    /// Keep the input container; otherwise write `dest_container`
    #[serde(default = "default_keep_container")]
    pub keep_container: bool,

    #[serde(default = "default_dest_container")]
    pub dest_container: String,
}

fn default_encoder() -> String {
    "hevc_vaapi".to_string()
}

fn default_max_muxing_queue_size() -> u32 {
    2048
}

fn default_advanced_options() -> String {
    "-strict -2\n-max_muxing_queue_size 2048\n-filter_hw_device vaapi0\n-vf format=nv12|vaapi,hwupload"
        .to_string()
}

fn default_keep_container() -> bool {
    true
}

fn default_dest_container() -> String {
    "mkv".to_string()
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            encoder: default_encoder(),
            advanced: false,
            hw_decoding: false,
            max_muxing_queue_size: default_max_muxing_queue_size(),
            main_options: String::new(),
            advanced_options: default_advanced_options(),
            custom_options: String::new(),
            keep_container: default_keep_container(),
            dest_container: default_dest_container(),
        }
    }
}

impl EncoderConfig {
    /// Whether the encoder needs a VAAPI device.
    pub fn is_vaapi(&self) -> bool {
        self.encoder.ends_with("_vaapi")
    }

    pub fn main_option_tokens(&self) -> Vec<String> {
        split_options(&self.main_options)
    }

    pub fn advanced_option_tokens(&self) -> Vec<String> {
        split_options(&self.advanced_options)
    }

    pub fn custom_option_tokens(&self) -> Vec<String> {
        split_options(&self.custom_options)
    }

    /// The forced destination container.
    pub fn container(&self) -> streamplan_av::Result<Container> {
        self.dest_container.parse()
    }
}

fn split_options(options: &str) -> Vec<String> {
    options.split_whitespace().map(str::to_string).collect()
}
