//! Shared fixtures for integration tests.
//!
//! [`FakeTools`] writes shell scripts standing in for ffprobe and ffmpeg into
//! a temp directory, plus media files with the right extensions. Scripts are
//! Unix-only.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// ffprobe JSON for a file with one H.264 video and one AAC audio stream.
pub fn h264_probe_json(filename: &Path) -> String {
    serde_json::json!({
        "streams": [
            { "index": 0, "codec_type": "video", "codec_name": "h264", "pix_fmt": "yuv420p",
              "tags": { "language": "und" } },
            { "index": 1, "codec_type": "audio", "codec_name": "aac",
              "tags": { "language": "eng" } }
        ],
        "format": {
            "filename": filename.to_string_lossy(),
            "format_name": "matroska,webm",
            "duration": "60.000000",
            "tags": { "ENCODER": "Lavf60.3.100" }
        }
    })
    .to_string()
}

/// ffprobe JSON for a file whose only video stream is already HEVC.
pub fn hevc_probe_json(filename: &Path) -> String {
    serde_json::json!({
        "streams": [
            { "index": 0, "codec_type": "video", "codec_name": "hevc", "pix_fmt": "yuv420p10le" },
            { "index": 1, "codec_type": "audio", "codec_name": "ac3" }
        ],
        "format": {
            "filename": filename.to_string_lossy(),
            "format_name": "matroska,webm"
        }
    })
    .to_string()
}

pub struct FakeTools {
    pub dir: TempDir,
}

impl FakeTools {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create an empty media file.
    pub fn media_file(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, b"").unwrap();
        path
    }

    /// Write an executable script printing `output` and exiting with `code`.
    #[cfg(unix)]
    pub fn script(&self, name: &str, output: &str, code: i32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let data = self.dir.path().join(format!("{}.out", name));
        fs::write(&data, output).unwrap();

        let path = self.dir.path().join(name);
        let body = format!("#!/bin/sh\ncat '{}'\nexit {}\n", data.display(), code);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Fake ffprobe printing `json` for any file.
    #[cfg(unix)]
    pub fn ffprobe(&self, json: &str) -> PathBuf {
        self.script("ffprobe", json, 0)
    }

    /// Fake ffmpeg that accepts anything.
    #[cfg(unix)]
    pub fn ffmpeg(&self) -> PathBuf {
        self.script("ffmpeg", "ffmpeg version test", 0)
    }

    /// Directory with one fake VAAPI render node.
    pub fn dri_dir(&self) -> PathBuf {
        let dir = self.dir.path().join("dri");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("renderD128"), b"").unwrap();
        dir
    }
}
