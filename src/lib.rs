//! Media Archivist - organize photos and videos by capture date
//!
//! This library moves media files into a date-partitioned directory
//! layout (`TARGET/YYYY/YYYY-MM-DD/`) with support for:
//! - Batched EXIF date extraction through exiftool
//! - Per-file video date extraction through ffprobe
//! - A pre-flight check for OS-level immutable flags
//! - Content-based duplicate and conflict detection
//! - Dry-run simulation with identical classification results

pub mod cli;
pub mod config;
pub mod discover;
pub mod error;
pub mod execute;
pub mod extract;
pub mod flags;
pub mod hash;
pub mod media;
pub mod os;
pub mod pipeline;
pub mod plan;
pub mod report;
pub mod resolve;

pub use cli::Cli;
pub use config::Config;
pub use error::{Error, Result};
pub use extract::{ExifToolSource, FfprobeSource, MetadataSource};
pub use media::{MediaItem, MediaKind, Outcome};
pub use pipeline::Pipeline;
pub use report::RunReport;
