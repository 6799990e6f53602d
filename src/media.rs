//! Media item model shared by all pipeline stages

use chrono::NaiveDate;
use std::path::PathBuf;

/// Classification of a media file by extension, selecting the metadata
/// extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
}

/// Terminal state of a media item after the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not yet classified or executed
    Pending,
    /// Moved to its target path (or would be, in dry-run)
    Moved,
    /// Byte-identical copy already exists; source is redundant
    Duplicate,
    /// Target occupied by a different file; nothing touched
    Conflict,
    /// No usable capture timestamp; excluded from the move phase
    MissingDate,
    /// Move attempted and failed; file left at source
    MoveFailed,
}

/// A single media file flowing through the pipeline.
///
/// Created at discovery, mutated by each stage, terminal once a
/// non-pending outcome is assigned.
#[derive(Debug, Clone)]
pub struct MediaItem {
    /// Original location of the file
    pub source: PathBuf,
    /// Lower-cased extension without the leading dot
    pub extension: String,
    /// Photo or video
    pub kind: MediaKind,
    /// Extracted capture date (date-only precision)
    pub date: Option<NaiveDate>,
    /// Planned destination, set once a date is known
    pub target: Option<PathBuf>,
    /// Final state of this item
    pub outcome: Outcome,
    /// Human-readable note for the report (error message or duplicate info)
    pub note: Option<String>,
}

impl MediaItem {
    pub fn new(source: PathBuf, extension: String, kind: MediaKind) -> Self {
        Self {
            source,
            extension,
            kind,
            date: None,
            target: None,
            outcome: Outcome::Pending,
            note: None,
        }
    }

    /// Assign a terminal outcome with an explanatory note
    pub fn settle(&mut self, outcome: Outcome, note: impl Into<String>) {
        self.outcome = outcome;
        self.note = Some(note.into());
    }
}
