//! Media file probing module.
//!
//! [`MetadataProbe`] runs ffprobe against a file, checks that the file's
//! content type is one the caller wants to handle, and keeps the parsed
//! result. A result computed by an earlier consumer can be adopted instead of
//! probing again, either directly or through a [`SharedInfo`] context.
//!
//! Data problems (missing file, disallowed type, unprobeable file) never
//! surface as errors here: the probe reports `None`/`false` and logs at debug
//! level, so one bad file does not abort a batch.

mod ffprobe;
mod mimetype;
pub mod search;
mod types;

pub use ffprobe::{ffprobe_command, parse_ffprobe_output, probe_with_ffprobe};
pub use mimetype::MimeTable;
pub use search::has_metadata;
pub use types::*;

use crate::{tools, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Content-type categories accepted when the caller does not choose.
pub const DEFAULT_ALLOWED_CATEGORIES: &[&str] = &["audio", "video", "image"];

/// Key under which probe results are handed between consumers.
const FFPROBE_KEY: &str = "ffprobe";

/// Probes files and caches the last accepted result.
#[derive(Debug, Clone)]
pub struct MetadataProbe {
    ffprobe: PathBuf,
    allowed: Vec<String>,
    mimetypes: MimeTable,
    result: ProbeResult,
}

impl MetadataProbe {
    /// Create a probe using the given ffprobe binary.
    ///
    /// An empty `allowed` list falls back to [`DEFAULT_ALLOWED_CATEGORIES`].
    pub fn new(ffprobe: impl Into<PathBuf>, allowed: Vec<String>, mimetypes: MimeTable) -> Self {
        let allowed = if allowed.is_empty() {
            DEFAULT_ALLOWED_CATEGORIES
                .iter()
                .map(|s| s.to_string())
                .collect()
        } else {
            allowed
        };

        Self {
            ffprobe: ffprobe.into(),
            allowed,
            mimetypes,
            result: ProbeResult::default(),
        }
    }

    /// Create a probe, locating ffprobe from configuration or `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ToolNotFound`] if ffprobe cannot be found.
    pub fn discover(
        configured: Option<&Path>,
        allowed: Vec<String>,
        mimetypes: MimeTable,
    ) -> Result<Self> {
        let ffprobe = tools::get_tool_path("ffprobe", configured)?;
        Ok(Self::new(ffprobe, allowed, mimetypes))
    }

    /// The accepted content-type categories.
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    fn has_allowed_type(&self, path: &Path) -> bool {
        let Some(category) = self.mimetypes.category(path) else {
            tracing::debug!("Unable to fetch file MIME type - {:?}", path);
            return false;
        };

        if !self.allowed.iter().any(|a| *a == category) {
            tracing::debug!(
                "File MIME type not in [{}] - {:?}",
                self.allowed.join(", "),
                path
            );
            return false;
        }

        true
    }

    /// Probe a file, replacing any previous result.
    ///
    /// Returns `None` (and leaves an empty result) if the file does not
    /// exist, has a disallowed content type, or cannot be probed.
    pub fn probe(&mut self, path: &Path) -> Option<&ProbeResult> {
        self.result = ProbeResult::default();

        if !path.exists() {
            tracing::debug!("File does not exist - {:?}", path);
            return None;
        }

        if !self.has_allowed_type(path) {
            return None;
        }

        match probe_with_ffprobe(&self.ffprobe, path) {
            Ok(result) => {
                self.result = result;
                Some(&self.result)
            }
            Err(e) => {
                tracing::debug!("File unable to be probed by ffprobe - {:?}: {}", path, e);
                None
            }
        }
    }

    /// Accept a result probed elsewhere, after the same content-type check.
    ///
    /// Returns `None` and keeps the current result when the metadata has no
    /// `format.filename` or the named file has a disallowed content type.
    pub fn adopt(&mut self, info: ProbeResult) -> Option<&ProbeResult> {
        let Some(filename) = info.filename() else {
            tracing::error!(
                "Provided file probe information does not contain the expected 'filename' key"
            );
            return None;
        };

        if !self.has_allowed_type(Path::new(filename)) {
            return None;
        }

        self.result = info;
        Some(&self.result)
    }

    /// The last accepted result, or an empty one.
    pub fn result(&self) -> &ProbeResult {
        &self.result
    }

    /// Look up a top-level section of the current result.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.result.get(key)
    }

    /// Establish a result for `path`, reusing one stored in `shared`.
    ///
    /// When `shared` already carries probe data it is adopted and the file is
    /// not probed again. Otherwise the file is probed and, on success, the
    /// result is written back so later consumers can adopt it.
    pub fn init(&mut self, path: &Path, shared: &mut SharedInfo) -> bool {
        if let Some(data) = shared.ffprobe() {
            let info = match ProbeResult::deserialize(data) {
                Ok(info) => info,
                Err(e) => {
                    tracing::error!("Shared probe information is malformed: {}", e);
                    return false;
                }
            };
            return self.adopt(info).is_some();
        }

        if self.probe(path).is_none() {
            return false;
        }

        shared.set_ffprobe(&self.result);
        true
    }
}

/// Caller-owned per-file context shared between consumers.
///
/// Only the `ffprobe` key is interpreted here; other keys belong to the
/// caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharedInfo(Map<String, Value>);

impl SharedInfo {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Stored probe data, ignoring null or empty entries.
    pub fn ffprobe(&self) -> Option<&Value> {
        self.0.get(FFPROBE_KEY).filter(|v| match v {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            _ => true,
        })
    }

    /// Store a probe result for later consumers.
    pub fn set_ffprobe(&mut self, result: &ProbeResult) {
        match serde_json::to_value(result) {
            Ok(value) => {
                self.0.insert(FFPROBE_KEY.to_string(), value);
            }
            Err(e) => tracing::warn!("Unable to store probe result in shared info: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn probe() -> MetadataProbe {
        MetadataProbe::new(
            "/nonexistent/ffprobe",
            vec!["video".to_string()],
            MimeTable::new(),
        )
    }

    fn result_for(filename: &str) -> ProbeResult {
        serde_json::from_value(json!({
            "format": { "filename": filename },
            "streams": [{ "codec_type": "video", "codec_name": "h264" }]
        }))
        .unwrap()
    }

    #[test]
    fn test_default_categories() {
        let p = MetadataProbe::new("ffprobe", Vec::new(), MimeTable::new());
        assert_eq!(p.allowed(), ["audio", "video", "image"]);
    }

    #[test]
    fn test_probe_missing_file_is_soft() {
        let mut p = probe();
        assert!(p.probe(Path::new("/definitely/not/here.mkv")).is_none());
        assert!(p.result().is_empty());
    }

    #[test]
    fn test_probe_disallowed_type_is_soft() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let mut p = probe();
        assert!(p.probe(file.path()).is_none());
    }

    #[test]
    fn test_probe_without_ffprobe_is_soft() {
        let file = tempfile::Builder::new().suffix(".mkv").tempfile().unwrap();
        let mut p = probe();
        assert!(p.probe(file.path()).is_none());
        assert!(p.result().is_empty());
    }

    #[test]
    fn test_adopt_accepts_allowed_file() {
        let mut p = probe();
        assert!(p.adopt(result_for("/media/movie.mkv")).is_some());
        assert_eq!(p.result().filename(), Some("/media/movie.mkv"));
        assert_eq!(p.result(), p.result());
    }

    #[test]
    fn test_adopt_rejects_missing_filename() {
        let mut p = probe();
        let info: ProbeResult =
            serde_json::from_value(json!({ "format": { "format_name": "matroska" } })).unwrap();
        assert!(p.adopt(info).is_none());
        assert!(p.result().is_empty());
    }

    #[test]
    fn test_adopt_rejects_disallowed_type() {
        let mut p = probe();
        assert!(p.adopt(result_for("/music/song.mp3")).is_none());
    }

    #[test]
    fn test_failed_adopt_keeps_previous_result() {
        let mut p = probe();
        p.adopt(result_for("/media/a.mkv")).unwrap();
        assert!(p.adopt(result_for("/music/b.flac")).is_none());
        assert_eq!(p.result().filename(), Some("/media/a.mkv"));
    }

    #[test]
    fn test_init_adopts_shared_info_without_probing() {
        let mut shared = SharedInfo::new();
        shared.set_ffprobe(&result_for("/media/movie.mkv"));

        // The path does not exist, so only adoption can succeed.
        let mut p = probe();
        assert!(p.init(Path::new("/not/on/disk.mkv"), &mut shared));
        assert_eq!(p.result().filename(), Some("/media/movie.mkv"));
    }

    #[test]
    fn test_init_rejects_malformed_shared_info() {
        let mut shared = SharedInfo::new();
        shared.insert("ffprobe", json!({ "streams": "not a list" }));
        let mut p = probe();
        assert!(!p.init(Path::new("/not/on/disk.mkv"), &mut shared));
    }

    #[test]
    fn test_init_ignores_empty_shared_entry() {
        let mut shared = SharedInfo::new();
        shared.insert("ffprobe", json!({}));
        assert!(shared.ffprobe().is_none());

        let mut p = probe();
        assert!(!p.init(Path::new("/not/on/disk.mkv"), &mut shared));
        assert_eq!(shared.get("ffprobe"), Some(&json!({})));
    }
}
