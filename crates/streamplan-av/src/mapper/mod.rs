//! Per-stream mapping decisions and ffmpeg argument assembly.
//!
//! A [`StreamMapper`] walks the streams of a [`crate::probe::ProbeResult`],
//! asks a [`StreamPolicy`] which ones need work, and produces
//! [`MappingDirectives`]. [`FfmpegArgs`] turns those directives plus the
//! option groups into the final argument list.

mod args;
mod classify;
mod engine;
mod policy;

pub use args::{FfmpegArgs, OptionGroup, NULL_OUTPUT};
pub use classify::{classify, ClassifiedStream, Classifier, StreamTypeCounters};
pub use engine::{MappingDirectives, StreamMapper};
pub use policy::{StreamMapping, StreamPolicy};
