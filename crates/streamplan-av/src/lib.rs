//! # streamplan-av
//!
//! Media probing and ffmpeg stream-mapping for video files.
//!
//! This crate provides functionality for:
//! - Probing media files with ffprobe and validating their content type
//! - Handing a probe result from one consumer to the next
//! - Deciding, per stream, whether to copy it or process it
//! - Assembling a complete ffmpeg argument list
//! - Searching probe metadata for loose key/value matches
//!
//! ## Example
//!
//! ```no_run
//! use streamplan_av::mapper::{FfmpegArgs, StreamMapper, StreamMapping, StreamPolicy};
//! use streamplan_av::probe::{MetadataProbe, MimeTable, StreamInfo, StreamKind};
//! use std::path::Path;
//!
//! struct CopyAll;
//!
//! impl StreamPolicy for CopyAll {
//!     fn needs_processing(&self, _stream: &StreamInfo) -> bool {
//!         false
//!     }
//!
//!     fn build_mapping(&self, _stream: &StreamInfo, _index: usize) -> Option<StreamMapping> {
//!         None
//!     }
//! }
//!
//! let mut probe = MetadataProbe::discover(None, vec!["video".into()], MimeTable::new())?;
//! let input = Path::new("/path/to/video.mkv");
//! let info = probe.probe(input).cloned().unwrap_or_default();
//!
//! let mut mapper = StreamMapper::new(CopyAll, &[StreamKind::Video]);
//! mapper.map_streams(&info)?;
//!
//! let mut args = FfmpegArgs::new();
//! args.set_input_file(input)?;
//! args.set_null_output();
//! args.set_directives(mapper.into_directives());
//! println!("ffmpeg {}", args.build()?.join(" "));
//! # Ok::<(), streamplan_av::Error>(())
//! ```

pub mod command;
mod error;
pub mod mapper;
pub mod probe;
pub mod remux;
pub mod tools;

// Re-exports
pub use command::{ToolCommand, ToolOutput};
pub use error::{Error, Result};
pub use mapper::{FfmpegArgs, MappingDirectives, StreamMapper, StreamMapping, StreamPolicy};
pub use probe::{has_metadata, MetadataProbe, MimeTable, ProbeResult, SharedInfo, StreamInfo, StreamKind};
pub use remux::Container;
pub use tools::{check_tool, check_tools, get_tool_path, require_tool, ToolInfo};
