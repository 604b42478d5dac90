//! Copy-versus-process decisions for every stream in a file.

use super::classify::{classify, ClassifiedStream};
use super::policy::{StreamMapping, StreamPolicy};
use crate::probe::{ProbeResult, StreamKind};
use crate::Result;

/// Selection and codec tokens accumulated over one mapping pass.
///
/// Both lists are extended together, one decision per stream, in stream
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingDirectives {
    /// `-map` tokens routing source streams to output slots.
    pub selection: Vec<String>,
    /// Codec tokens for the routed streams.
    pub codec: Vec<String>,
}

impl MappingDirectives {
    pub fn is_empty(&self) -> bool {
        self.selection.is_empty() && self.codec.is_empty()
    }

    fn push_copy(&mut self, kind: StreamKind, index: usize) {
        let spec = kind.specifier();
        self.selection
            .extend(["-map".to_string(), format!("0:{}:{}", spec, index)]);
        self.codec
            .extend([format!("-c:{}:{}", spec, index), "copy".to_string()]);
    }

    fn push_mapping(&mut self, mapping: StreamMapping) {
        self.selection.extend(mapping.stream_mapping);
        self.codec.extend(mapping.stream_encoding);
    }
}

/// Runs a [`StreamPolicy`] over the streams of a probed file.
///
/// # Example
///
/// ```
/// use streamplan_av::mapper::{StreamMapper, StreamMapping, StreamPolicy};
/// use streamplan_av::probe::{ProbeResult, StreamInfo, StreamKind};
///
/// struct ToHevc;
///
/// impl StreamPolicy for ToHevc {
///     fn needs_processing(&self, stream: &StreamInfo) -> bool {
///         stream.codec_name.as_deref() != Some("hevc")
///     }
///
///     fn build_mapping(&self, _stream: &StreamInfo, index: usize) -> Option<StreamMapping> {
///         Some(StreamMapping::new(
///             ["-map".to_string(), format!("0:v:{index}")],
///             [format!("-c:v:{index}"), "libx265".to_string()],
///         ))
///     }
/// }
///
/// let probe: ProbeResult = serde_json::from_str(
///     r#"{"format": {"filename": "a.mkv"}, "streams": [{"codec_type": "video", "codec_name": "h264"}]}"#,
/// )?;
///
/// let mut mapper = StreamMapper::new(ToHevc, &[StreamKind::Video]);
/// assert!(mapper.map_streams(&probe)?);
/// assert_eq!(mapper.directives().codec, ["-c:v:0", "libx265"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct StreamMapper<P> {
    policy: P,
    processing: Vec<StreamKind>,
    directives: MappingDirectives,
}

impl<P: StreamPolicy> StreamMapper<P> {
    /// Create a mapper that consults `policy` for streams of the given kinds.
    /// Streams of any other kind are always copied.
    pub fn new(policy: P, processing: &[StreamKind]) -> Self {
        let mut kinds = processing.to_vec();
        kinds.sort();
        kinds.dedup();

        Self {
            policy,
            processing: kinds,
            directives: MappingDirectives::default(),
        }
    }

    /// Like [`StreamMapper::new`], parsing kind names such as `"video"`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] for an unknown kind name.
    pub fn from_names<S: AsRef<str>>(policy: P, processing: &[S]) -> Result<Self> {
        let kinds = processing
            .iter()
            .map(|name| name.as_ref().parse::<StreamKind>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(policy, &kinds))
    }

    /// Kinds handed to the policy, sorted.
    pub fn processing_kinds(&self) -> &[StreamKind] {
        &self.processing
    }

    /// Directives from the last pass.
    pub fn directives(&self) -> &MappingDirectives {
        &self.directives
    }

    /// Take the directives from the last pass.
    pub fn into_directives(self) -> MappingDirectives {
        self.directives
    }

    /// Decide copy or custom mapping for every stream of `probe`.
    ///
    /// Replaces any directives from a previous pass. Returns `true` if at
    /// least one stream got a custom mapping, i.e. encoding work is needed
    /// rather than a plain stream copy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidMapping`] if the policy produces a
    /// malformed mapping.
    pub fn map_streams(&mut self, probe: &ProbeResult) -> Result<bool> {
        let mut directives = MappingDirectives::default();
        let mut found_streams_to_process = false;

        for classified in classify(&probe.streams) {
            if self.decide(&classified, &mut directives)? {
                found_streams_to_process = true;
            }
        }

        self.directives = directives;
        Ok(found_streams_to_process)
    }

    /// Handle one stream; returns whether it got a custom mapping.
    fn decide(
        &self,
        classified: &ClassifiedStream<'_>,
        directives: &mut MappingDirectives,
    ) -> Result<bool> {
        let ClassifiedStream {
            kind,
            index,
            stream,
        } = *classified;

        if !self.processing.contains(&kind) || !self.policy.needs_processing(stream) {
            directives.push_copy(kind, index);
            return Ok(false);
        }

        match self.policy.build_mapping(stream, index) {
            Some(mapping) => {
                mapping.validate()?;
                tracing::trace!("Custom mapping for {} stream {}: {:?}", kind, index, mapping);
                directives.push_mapping(mapping);
                Ok(true)
            }
            None => {
                directives.push_copy(kind, index);
                Ok(false)
            }
        }
    }

    /// Selection tokens, running a pass first if there are none yet.
    pub fn stream_mapping(&mut self, probe: &ProbeResult) -> Result<&[String]> {
        if self.directives.selection.is_empty() {
            self.map_streams(probe)?;
        }
        Ok(&self.directives.selection)
    }

    /// Codec tokens, running a pass first if there are none yet.
    pub fn stream_encoding(&mut self, probe: &ProbeResult) -> Result<&[String]> {
        if self.directives.codec.is_empty() {
            self.map_streams(probe)?;
        }
        Ok(&self.directives.codec)
    }
}
