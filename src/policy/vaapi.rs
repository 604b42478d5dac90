//! VAAPI device discovery and ffmpeg options.

use super::PolicyError;
use std::path::{Path, PathBuf};
use streamplan_av::FfmpegArgs;

/// Directory holding DRM render nodes.
pub const DRI_DIR: &str = "/dev/dri";

/// Name of the ffmpeg hardware device created with hardware decoding.
const DEVICE_ID: &str = "vaapi0";

const UPLOAD_FILTER: &str = "format=nv12|vaapi,hwupload";

/// `render*` nodes in `dir`, sorted. A missing directory yields none.
pub fn list_render_devices(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut devices: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("render"))
        .map(|entry| entry.path())
        .collect();
    devices.sort();
    devices
}

/// Named options for one VAAPI device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaapiOptions {
    pub generic: Vec<(String, String)>,
    pub advanced: Vec<(String, String)>,
}

impl VaapiOptions {
    pub fn new(device: &Path, hw_decoding: bool) -> Self {
        let device = device.to_string_lossy();

        if hw_decoding {
            let init = format!("vaapi={}:{}", DEVICE_ID, device);
            Self {
                generic: pairs(&[
                    ("-init_hw_device", init.as_str()),
                    ("-hwaccel", "vaapi"),
                    ("-hwaccel_output_format", "vaapi"),
                    ("-hwaccel_device", DEVICE_ID),
                ]),
                advanced: pairs(&[("-filter_hw_device", DEVICE_ID), ("-vf", UPLOAD_FILTER)]),
            }
        } else {
            Self {
                generic: pairs(&[("-vaapi_device", device.as_ref())]),
                advanced: pairs(&[("-vf", UPLOAD_FILTER)]),
            }
        }
    }

    /// Merge into the generic and advanced option groups.
    pub fn apply(&self, args: &mut FfmpegArgs) {
        args.set_generic_options(&[], &borrowed(&self.generic));
        args.set_advanced_options(&[], &borrowed(&self.advanced));
    }
}

/// Apply options for the first render node under `dir`.
///
/// Returns the device used.
pub fn apply_default_args(
    args: &mut FfmpegArgs,
    dir: &Path,
    hw_decoding: bool,
) -> Result<PathBuf, PolicyError> {
    let device = list_render_devices(dir)
        .into_iter()
        .next()
        .ok_or_else(|| PolicyError::NoVaapiDevice {
            dir: dir.to_path_buf(),
        })?;

    tracing::debug!("Using VAAPI device {:?}", device);
    VaapiOptions::new(&device, hw_decoding).apply(args);
    Ok(device)
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn borrowed(items: &[(String, String)]) -> Vec<(&str, &str)> {
    items.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}
