//! Capture date extraction
//!
//! Two metadata sources behind one interface: photos are read in batches
//! through exiftool, videos one at a time through ffprobe. The pipeline
//! core only sees the trait, so tests can substitute an in-memory source
//! and never shell out.

pub mod exiftool;
pub mod ffprobe;

use crate::error::Result;
use crate::media::MediaKind;
use chrono::NaiveDateTime;
use std::path::PathBuf;

pub use exiftool::ExifToolSource;
pub use ffprobe::FfprobeSource;

/// A source of capture timestamps for one media kind.
///
/// `extract` returns one entry per input path, in input order; `None`
/// marks a file with no usable timestamp (non-fatal). The progress
/// callback is invoked with the number of files completed since the
/// previous call, after each internal unit of work (batch or item).
pub trait MetadataSource: Sync {
    /// The media kind this source knows how to read
    fn kind(&self) -> MediaKind;

    /// Verify the backing tool is usable; called once per run, only when
    /// files of this kind were discovered
    fn ensure_available(&self) -> Result<()>;

    /// Extract capture timestamps for the given files
    fn extract(
        &self,
        paths: &[PathBuf],
        progress: &(dyn Fn(usize) + Sync),
    ) -> Vec<Option<NaiveDateTime>>;
}
