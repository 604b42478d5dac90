//! Loose metadata search over a probe result.
//!
//! Tag and format keys match when they *contain* the search key (after
//! lowercasing the key), and values match when they contain the search value.
//! Stream-level fields are matched by exact field name. Each segment is
//! checked independently. A stream segment is skipped as soon as one of its
//! streams has no tags at all.

use super::types::{ProbeResult, StreamInfo};
use serde_json::Value;
use std::collections::BTreeMap;

/// Check whether a file's probe data carries `key` with `value`.
///
/// Looks at, in order: top-level fields of video streams, the flattened
/// format section, and the merged tags of attachment, video and audio
/// streams.
pub fn has_metadata(result: &ProbeResult, key: &str, value: &str) -> bool {
    let found = video_field_matches(result, key, value)
        || format_matches(result, key, value)
        || ["attachment", "video", "audio"]
            .iter()
            .any(|kind| merged_tags_match(result, kind, key, value));

    tracing::debug!(
        "File {:?} {} metadata '{}': '{}'",
        result.filename().unwrap_or_default(),
        if found { "contains" } else { "does not contain" },
        key,
        value
    );

    found
}

fn streams_of<'a>(result: &'a ProbeResult, kind: &'a str) -> impl Iterator<Item = &'a StreamInfo> {
    result
        .streams
        .iter()
        .filter(move |s| s.codec_type.as_deref() == Some(kind))
}

fn entry_matches(entry_key: &str, entry_value: &str, key: &str, value: &str) -> bool {
    entry_key.to_lowercase().contains(key) && entry_value.contains(value)
}

fn video_field_matches(result: &ProbeResult, key: &str, value: &str) -> bool {
    streams_of(result, "video")
        .filter_map(|s| s.field_str(key))
        .any(|v| v.contains(value))
}

fn format_matches(result: &ProbeResult, key: &str, value: &str) -> bool {
    // Nested mappings (e.g. `tags`) are merged over the scalar entries.
    let mut flat: BTreeMap<&str, &Value> = result
        .format
        .iter()
        .filter(|(_, v)| !v.is_object())
        .map(|(k, v)| (k.as_str(), v))
        .collect();

    for nested in result.format.values().filter_map(Value::as_object) {
        for (k, v) in nested {
            flat.insert(k.as_str(), v);
        }
    }

    flat.iter().any(|(k, v)| {
        v.as_str()
            .is_some_and(|s| entry_matches(k, s, key, value))
    })
}

fn merged_tags_match(result: &ProbeResult, kind: &str, key: &str, value: &str) -> bool {
    if streams_of(result, kind).any(|s| s.tags.is_none()) {
        return false;
    }

    let mut merged: BTreeMap<&str, &str> = BTreeMap::new();
    for tags in streams_of(result, kind).filter_map(|s| s.tags.as_ref()) {
        for (k, v) in tags {
            merged.insert(k.as_str(), v.as_str());
        }
    }

    merged.iter().any(|(k, v)| entry_matches(k, v, key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ProbeResult {
        serde_json::from_value(json!({
            "format": {
                "filename": "/media/movie.mkv",
                "format_name": "matroska,webm",
                "nb_streams": 3,
                "tags": { "ENCODER": "HandBrake 1.6", "title": "Movie" }
            },
            "streams": [
                { "codec_type": "video", "codec_name": "hevc", "pix_fmt": "yuv420p10le",
                  "tags": { "BPS-eng": "9000000" } },
                { "codec_type": "audio", "codec_name": "aac",
                  "tags": { "language": "eng" } },
                { "codec_type": "audio", "codec_name": "ac3",
                  "tags": { "language": "jpn" } },
                { "codec_type": "attachment", "codec_name": "ttf",
                  "tags": { "mimetype": "application/x-truetype-font" } }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_video_stream_field() {
        let r = sample();
        assert!(has_metadata(&r, "codec_name", "hevc"));
        assert!(has_metadata(&r, "pix_fmt", "yuv420p10le"));
        // Substring of the value is enough.
        assert!(has_metadata(&r, "pix_fmt", "10le"));
        assert!(!has_metadata(&r, "codec_name", "h264"));
    }

    #[test]
    fn test_audio_codec_is_not_a_video_field() {
        let r = sample();
        // Audio streams are only searched through their tags.
        assert!(!has_metadata(&r, "codec_name", "aac"));
    }

    #[test]
    fn test_format_keys_are_lowercased_and_substring_matched() {
        let r = sample();
        assert!(has_metadata(&r, "encoder", "HandBrake"));
        assert!(has_metadata(&r, "enc", "Hand"));
        assert!(has_metadata(&r, "format", "matroska"));
        // Values are not lowercased.
        assert!(!has_metadata(&r, "encoder", "handbrake"));
        // Non-string values never match.
        assert!(!has_metadata(&r, "nb_streams", "3"));
    }

    #[test]
    fn test_stream_tags() {
        let r = sample();
        assert!(has_metadata(&r, "mimetype", "truetype"));
        assert!(has_metadata(&r, "bps", "9000"));
    }

    #[test]
    fn test_same_tag_on_later_stream_wins() {
        let r = sample();
        // Both audio streams carry `language`; the merged map keeps the last.
        assert!(has_metadata(&r, "language", "jpn"));
        assert!(!has_metadata(&r, "language", "eng"));
    }

    #[test]
    fn test_streams_without_tags() {
        let r: ProbeResult = serde_json::from_value(json!({
            "format": { "filename": "a.mkv" },
            "streams": [ { "codec_type": "video", "codec_name": "h264" } ]
        }))
        .unwrap();
        assert!(has_metadata(&r, "codec_name", "h264"));
        assert!(!has_metadata(&r, "language", "eng"));
    }

    #[test]
    fn test_untagged_stream_hides_segment_tags() {
        let r: ProbeResult = serde_json::from_value(json!({
            "format": { "filename": "a.mkv" },
            "streams": [
                { "codec_type": "video", "codec_name": "h264", "tags": { "title": "Main" } },
                { "codec_type": "audio", "codec_name": "aac", "tags": { "language": "eng" } },
                { "codec_type": "audio", "codec_name": "ac3" }
            ]
        }))
        .unwrap();
        assert!(!has_metadata(&r, "language", "eng"));
        // Other segments are still searched.
        assert!(has_metadata(&r, "title", "Main"));
    }
}
