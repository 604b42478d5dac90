//! Probe result types.
//!
//! These mirror the JSON document ffprobe prints with `-show_format
//! -show_streams -show_error`. Fields the planner does not interpret are kept
//! verbatim so a result can be handed to another consumer unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Parsed ffprobe metadata for one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Container-level fields (`filename`, `format_name`, `tags`, ...).
    #[serde(default)]
    pub format: Map<String, Value>,
    /// Elementary streams in container order.
    #[serde(default)]
    pub streams: Vec<StreamInfo>,
    /// Error object reported by ffprobe, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// One elementary stream as reported by ffprobe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    /// `video`, `audio`, `subtitle`, `data` or `attachment`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec_type: Option<String>,
    /// Codec short name (e.g. `h264`, `hevc`, `aac`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec_name: Option<String>,
    /// Pixel format for video streams (e.g. `yuv420p10le`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pix_fmt: Option<String>,
    /// Stream tags such as `language` or `title`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    /// Every other field, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProbeResult {
    /// The `format.filename` value, if present and non-empty.
    pub fn filename(&self) -> Option<&str> {
        self.format
            .get("filename")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Whether nothing has been probed into this result.
    pub fn is_empty(&self) -> bool {
        self.format.is_empty() && self.streams.is_empty() && self.error.is_none()
    }

    /// Look up a top-level section (`format`, `streams` or `error`) as JSON.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "format" => Some(Value::Object(self.format.clone())),
            "streams" => serde_json::to_value(&self.streams).ok(),
            "error" => self.error.clone(),
            _ => None,
        }
    }
}

impl StreamInfo {
    /// The stream kind, if `codec_type` names one of the five known kinds.
    pub fn kind(&self) -> Option<StreamKind> {
        self.codec_type.as_deref().and_then(|t| t.parse().ok())
    }

    /// A top-level field as a string, looking at the typed fields first.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        match key {
            "codec_type" => self.codec_type.as_deref(),
            "codec_name" => self.codec_name.as_deref(),
            "pix_fmt" => self.pix_fmt.as_deref(),
            _ => self.extra.get(key).and_then(Value::as_str),
        }
    }
}

/// Kind of elementary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
    Data,
    Attachment,
}

impl StreamKind {
    /// All kinds, in a fixed order.
    pub const ALL: [StreamKind; 5] = [
        StreamKind::Video,
        StreamKind::Audio,
        StreamKind::Subtitle,
        StreamKind::Data,
        StreamKind::Attachment,
    ];

    /// The name ffprobe uses in `codec_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Video => "video",
            StreamKind::Audio => "audio",
            StreamKind::Subtitle => "subtitle",
            StreamKind::Data => "data",
            StreamKind::Attachment => "attachment",
        }
    }

    /// The ffmpeg stream specifier letter (`0:v:1`, `-c:a:0`).
    pub fn specifier(&self) -> char {
        match self {
            StreamKind::Video => 'v',
            StreamKind::Audio => 'a',
            StreamKind::Subtitle => 's',
            StreamKind::Data => 'd',
            StreamKind::Attachment => 't',
        }
    }

    /// Position of this kind in [`StreamKind::ALL`].
    pub(crate) fn slot(&self) -> usize {
        *self as usize
    }
}

impl FromStr for StreamKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "video" => Ok(StreamKind::Video),
            "audio" => Ok(StreamKind::Audio),
            "subtitle" => Ok(StreamKind::Subtitle),
            "data" => Ok(StreamKind::Data),
            "attachment" => Ok(StreamKind::Attachment),
            _ => Err(Error::InvalidInput(format!(
                "stream kind must be one of video, audio, subtitle, data, attachment: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
