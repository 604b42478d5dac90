//! Caller-supplied stream policies.

use crate::probe::StreamInfo;
use crate::{Error, Result};
use serde_json::Value;

/// Decides which streams need processing and how to process them.
///
/// Both methods are required: the mapper has no default behavior for either.
pub trait StreamPolicy {
    /// Return `true` if the stream must be processed rather than copied.
    fn needs_processing(&self, stream: &StreamInfo) -> bool;

    /// Build the mapping for a stream that needs processing.
    ///
    /// `index` is the stream's position among streams of the same kind.
    /// Returning `None` falls back to copying the stream.
    fn build_mapping(&self, stream: &StreamInfo, index: usize) -> Option<StreamMapping>;
}

impl<P: StreamPolicy + ?Sized> StreamPolicy for &P {
    fn needs_processing(&self, stream: &StreamInfo) -> bool {
        (**self).needs_processing(stream)
    }

    fn build_mapping(&self, stream: &StreamInfo, index: usize) -> Option<StreamMapping> {
        (**self).build_mapping(stream, index)
    }
}

impl<P: StreamPolicy + ?Sized> StreamPolicy for Box<P> {
    fn needs_processing(&self, stream: &StreamInfo) -> bool {
        (**self).needs_processing(stream)
    }

    fn build_mapping(&self, stream: &StreamInfo, index: usize) -> Option<StreamMapping> {
        (**self).build_mapping(stream, index)
    }
}

/// Custom routing and codec tokens for one stream.
///
/// Empty lists are allowed; a mapping with no selection tokens drops the
/// stream from the output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamMapping {
    /// Selection tokens, e.g. `["-map", "0:v:0"]`.
    pub stream_mapping: Vec<String>,
    /// Codec tokens, e.g. `["-c:v:0", "libx265"]`.
    pub stream_encoding: Vec<String>,
}

impl StreamMapping {
    pub fn new<I, J, S, T>(stream_mapping: I, stream_encoding: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            stream_mapping: stream_mapping.into_iter().map(Into::into).collect(),
            stream_encoding: stream_encoding.into_iter().map(Into::into).collect(),
        }
    }

    /// Reject mappings that would put an empty token on the command line.
    pub fn validate(&self) -> Result<()> {
        for (name, tokens) in [
            ("stream_mapping", &self.stream_mapping),
            ("stream_encoding", &self.stream_encoding),
        ] {
            if let Some(pos) = tokens.iter().position(|t| t.is_empty()) {
                return Err(Error::invalid_mapping(format!(
                    "'{}' token {} is empty",
                    name, pos
                )));
            }
        }
        Ok(())
    }
}

impl TryFrom<Value> for StreamMapping {
    type Error = Error;

    /// Build a mapping from a JSON object with `stream_mapping` and
    /// `stream_encoding` string lists.
    fn try_from(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::invalid_mapping("stream mapping must be an object"));
        };

        let list = |key: &str| -> Result<Vec<String>> {
            let entry = map.get(key).ok_or_else(|| {
                Error::invalid_mapping(format!("stream mapping must contain '{}' key", key))
            })?;
            let items = entry.as_array().ok_or_else(|| {
                Error::invalid_mapping(format!("'{}' value must be a list", key))
            })?;
            items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        Error::invalid_mapping(format!("'{}' items must be strings", key))
                    })
                })
                .collect()
        };

        let mapping = Self {
            stream_mapping: list("stream_mapping")?,
            stream_encoding: list("stream_encoding")?,
        };
        mapping.validate()?;
        Ok(mapping)
    }
}
