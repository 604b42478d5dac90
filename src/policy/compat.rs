//! Playback compatibility check.
//!
//! Files already in H.264 or HEVC play directly unless they are 10-bit, so
//! they are left out of the encode queue.

use serde::Serialize;
use streamplan_av::{has_metadata, ProbeResult};

/// Codec facts relevant to the compatibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompatReport {
    pub is_hevc: bool,
    pub is_h264: bool,
    pub is_ten_bit: bool,
}

impl CompatReport {
    pub fn from_probe(result: &ProbeResult) -> Self {
        Self {
            is_hevc: has_metadata(result, "codec_name", "hevc"),
            is_h264: has_metadata(result, "codec_name", "h264"),
            is_ten_bit: has_metadata(result, "pix_fmt", "yuv420p10le"),
        }
    }

    /// Whether the file should be kept out of the queue.
    pub fn should_skip(&self) -> bool {
        (self.is_hevc || self.is_h264) && !self.is_ten_bit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn probe(codec: &str, pix_fmt: &str) -> ProbeResult {
        serde_json::from_value(json!({
            "format": { "filename": "/media/a.mkv" },
            "streams": [
                { "codec_type": "video", "codec_name": codec, "pix_fmt": pix_fmt },
                { "codec_type": "audio", "codec_name": "aac" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_eight_bit_h264_is_skipped() {
        let report = CompatReport::from_probe(&probe("h264", "yuv420p"));
        assert!(report.is_h264);
        assert!(!report.is_ten_bit);
        assert!(report.should_skip());
    }

    #[test]
    fn test_ten_bit_hevc_is_kept() {
        let report = CompatReport::from_probe(&probe("hevc", "yuv420p10le"));
        assert!(report.is_hevc);
        assert!(report.is_ten_bit);
        assert!(!report.should_skip());
    }

    #[test]
    fn test_other_codecs_are_kept() {
        assert!(!CompatReport::from_probe(&probe("mpeg2video", "yuv420p")).should_skip());
    }
}
