//! Re-encode video streams to HEVC.

use crate::config::EncoderConfig;
use streamplan_av::{StreamInfo, StreamKind, StreamMapping, StreamPolicy};

/// Still-image codecs that are never re-encoded.
pub const IMAGE_VIDEO_CODECS: &[&str] = &[
    "alias_pix",
    "apng",
    "brender_pix",
    "dds",
    "dpx",
    "exr",
    "fits",
    "gif",
    "mjpeg",
    "mjpegb",
    "pam",
    "pbm",
    "pcx",
    "pfm",
    "pgm",
    "pgmyuv",
    "pgx",
    "photocd",
    "pictor",
    "pixlet",
    "png",
    "ppm",
    "ptx",
    "sgi",
    "sunrast",
    "tiff",
    "vc1image",
    "wmv3image",
    "xbm",
    "xface",
    "xpm",
    "xwd",
];

/// Policy that maps every non-HEVC video stream to an HEVC encoder.
#[derive(Debug, Clone)]
pub struct HevcPolicy {
    encoder: String,
    custom_options: Vec<String>,
}

impl HevcPolicy {
    /// Stream kinds this policy is consulted for.
    pub const PROCESSING: &'static [StreamKind] = &[StreamKind::Video];

    pub fn new(encoder: impl Into<String>) -> Self {
        Self {
            encoder: encoder.into(),
            custom_options: Vec::new(),
        }
    }

    /// Extra tokens appended after the codec selection.
    pub fn with_custom_options(mut self, options: Vec<String>) -> Self {
        self.custom_options = options;
        self
    }

    /// Policy for an encoder configuration; custom options only apply in
    /// advanced mode.
    pub fn from_config(config: &EncoderConfig) -> Self {
        let policy = Self::new(config.encoder.clone());
        if config.advanced {
            policy.with_custom_options(config.custom_option_tokens())
        } else {
            policy
        }
    }

    pub fn encoder(&self) -> &str {
        &self.encoder
    }
}

impl StreamPolicy for HevcPolicy {
    fn needs_processing(&self, stream: &StreamInfo) -> bool {
        let Some(codec) = stream.codec_name.as_deref() else {
            return true;
        };
        let codec = codec.to_lowercase();

        !(IMAGE_VIDEO_CODECS.contains(&codec.as_str()) || codec == "hevc" || codec == "h265")
    }

    fn build_mapping(&self, _stream: &StreamInfo, index: usize) -> Option<StreamMapping> {
        let mut encoding = vec![format!("-c:v:{}", index), self.encoder.clone()];
        encoding.extend(self.custom_options.iter().cloned());

        Some(StreamMapping::new(
            ["-map".to_string(), format!("0:v:{}", index)],
            encoding,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(codec: Option<&str>) -> StreamInfo {
        StreamInfo {
            codec_type: Some("video".to_string()),
            codec_name: codec.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_needs_processing() {
        let policy = HevcPolicy::new("hevc_vaapi");
        assert!(policy.needs_processing(&video(Some("h264"))));
        assert!(policy.needs_processing(&video(Some("mpeg2video"))));
        assert!(!policy.needs_processing(&video(Some("hevc"))));
        assert!(!policy.needs_processing(&video(Some("H265"))));
        assert!(!policy.needs_processing(&video(Some("mjpeg"))));
        assert!(!policy.needs_processing(&video(Some("png"))));
        assert!(policy.needs_processing(&video(None)));
    }

    #[test]
    fn test_build_mapping() {
        let policy = HevcPolicy::new("hevc_vaapi");
        let mapping = policy.build_mapping(&video(Some("h264")), 1).unwrap();
        assert_eq!(mapping.stream_mapping, ["-map", "0:v:1"]);
        assert_eq!(mapping.stream_encoding, ["-c:v:1", "hevc_vaapi"]);
    }

    #[test]
    fn test_custom_options_only_in_advanced_mode() {
        let mut config = EncoderConfig {
            encoder: "libx265".to_string(),
            custom_options: "-crf 22\n-preset slow".to_string(),
            ..Default::default()
        };

        let mapping = HevcPolicy::from_config(&config)
            .build_mapping(&video(Some("h264")), 0)
            .unwrap();
        assert_eq!(mapping.stream_encoding, ["-c:v:0", "libx265"]);

        config.advanced = true;
        let mapping = HevcPolicy::from_config(&config)
            .build_mapping(&video(Some("h264")), 0)
            .unwrap();
        assert_eq!(
            mapping.stream_encoding,
            ["-c:v:0", "libx265", "-crf", "22", "-preset", "slow"]
        );
    }
}
