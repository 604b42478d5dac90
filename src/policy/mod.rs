//! Encoding policies plugged into the stream mapper.

pub mod compat;
pub mod hevc;
pub mod vaapi;

pub use compat::CompatReport;
pub use hevc::HevcPolicy;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("No VAAPI device found in {dir:?}")]
    NoVaapiDevice { dir: PathBuf },
}
