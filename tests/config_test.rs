//! Configuration loading and validation tests.

use std::fs;
use streamplan::config::{load_config, load_config_or_default, validate_config, Config};
use streamplan_av::Container;
use tempfile::tempdir;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.probe.allowed_mimetypes, ["video"]);
    assert!(config.tools.ffmpeg_path.is_none());
    assert_eq!(config.encoder.encoder, "hevc_vaapi");
    assert_eq!(config.encoder.max_muxing_queue_size, 2048);
    assert!(!config.encoder.advanced);
    assert!(config.encoder.keep_container);
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_load_full_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("streamplan.toml");
    fs::write(
        &path,
        r#"
[probe]
allowed_mimetypes = ["video", "audio"]

[probe.mimetype_overrides]
ts = "video/mp2t"
".bdmv" = "video/x-bdmv"

[tools]
ffprobe_path = "/usr/bin/ffprobe"

[encoder]
encoder = "libx265"
advanced = true
custom_options = "-crf 22"
keep_container = false
dest_container = "MP4"
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.probe.allowed_mimetypes, ["video", "audio"]);
    assert_eq!(
        config.probe.mime_table().guess_type(std::path::Path::new("disc.bdmv")).as_deref(),
        Some("video/x-bdmv")
    );
    assert_eq!(config.tools.ffprobe_path.as_deref(), Some(std::path::Path::new("/usr/bin/ffprobe")));
    assert_eq!(config.encoder.encoder, "libx265");
    assert!(!config.encoder.is_vaapi());
    assert_eq!(config.encoder.custom_option_tokens(), ["-crf", "22"]);
    assert_eq!(config.encoder.container().unwrap(), Container::Mp4);
    // Unset fields keep their defaults.
    assert_eq!(config.encoder.max_muxing_queue_size, 2048);
}

#[test]
fn test_rejects_invalid_values() {
    let dir = tempdir().unwrap();
    let cases = [
        "[probe]\nallowed_mimetypes = []\n",
        "[encoder]\nmax_muxing_queue_size = 512\n",
        "[encoder]\nmax_muxing_queue_size = 20000\n",
        "[encoder]\ndest_container = \"flv\"\n",
        "[encoder]\nencoder = \"  \"\n",
        "[encoder\n",
    ];

    for (i, case) in cases.iter().enumerate() {
        let path = dir.path().join(format!("bad-{i}.toml"));
        fs::write(&path, case).unwrap();
        assert!(load_config(&path).is_err(), "accepted {case:?}");
    }
}

#[test]
fn test_queue_size_bounds_are_inclusive() {
    let mut config = Config::default();
    config.encoder.max_muxing_queue_size = 1024;
    assert!(validate_config(&config).is_ok());
    config.encoder.max_muxing_queue_size = 10240;
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_missing_explicit_path_is_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    assert!(load_config_or_default(Some(&missing)).is_err());
}
