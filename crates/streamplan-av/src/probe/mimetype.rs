//! Content-type lookup by file extension.
//!
//! `mime_guess` supplies the system-default table. Container formats it
//! misses or classifies as something other than media are covered by an
//! override table, which callers can extend from configuration.

use std::collections::BTreeMap;
use std::path::Path;

/// Extension overrides applied on top of `mime_guess`.
const DEFAULT_OVERRIDES: &[(&str, &str)] = &[
    ("3gp", "video/3gpp"),
    ("asf", "video/x-ms-asf"),
    ("avi", "video/x-msvideo"),
    ("divx", "video/divx"),
    ("flv", "video/x-flv"),
    ("m2ts", "video/mp2t"),
    ("m4v", "video/mp4"),
    ("mk3d", "video/x-matroska"),
    ("mka", "audio/x-matroska"),
    ("mkv", "video/x-matroska"),
    ("mov", "video/quicktime"),
    ("mts", "video/mp2t"),
    ("ogm", "video/ogg"),
    ("rm", "video/vnd.rn-realvideo"),
    ("rmvb", "video/vnd.rn-realvideo"),
    ("ts", "video/mp2t"),
    ("vob", "video/dvd"),
    ("webm", "video/webm"),
    ("wmv", "video/x-ms-wmv"),
    ("wtv", "video/wtv"),
];

/// Extension to content-type table.
#[derive(Debug, Clone)]
pub struct MimeTable {
    overrides: BTreeMap<String, String>,
}

impl MimeTable {
    /// Table with the built-in container overrides.
    pub fn new() -> Self {
        let overrides = DEFAULT_OVERRIDES
            .iter()
            .map(|(ext, mime)| (ext.to_string(), mime.to_string()))
            .collect();
        Self { overrides }
    }

    /// Add or replace overrides. Extensions may be given with or without a
    /// leading dot.
    pub fn with_overrides<'a, I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (ext, mime) in overrides {
            self.insert(ext, mime);
        }
        self
    }

    /// Add or replace one override.
    pub fn insert(&mut self, extension: &str, mime: &str) {
        self.overrides
            .insert(normalize_extension(extension), mime.to_string());
    }

    /// Guess the content type of a path from its extension.
    pub fn guess_type(&self, path: &Path) -> Option<String> {
        let ext = path.extension()?.to_str()?;
        if let Some(mime) = self.overrides.get(&normalize_extension(ext)) {
            return Some(mime.clone());
        }
        mime_guess::from_ext(ext)
            .first()
            .map(|m| m.essence_str().to_string())
    }

    /// The top-level category (`video`, `audio`, `image`, ...) of a path.
    pub fn category(&self, path: &Path) -> Option<String> {
        self.guess_type(path)
            .and_then(|mime| mime.split('/').next().map(str::to_string))
            .filter(|c| !c.is_empty())
    }
}

impl Default for MimeTable {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}
