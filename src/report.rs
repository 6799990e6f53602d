//! Run report accumulation
//!
//! Outcomes and error notes are collected from the items once the
//! pipeline finishes; the report drives both the final summary and the
//! process exit code.

use crate::media::{MediaItem, Outcome};
use std::path::PathBuf;

/// Aggregated result of one organizing run
#[derive(Debug, Default)]
pub struct RunReport {
    pub total: usize,
    pub moved: usize,
    pub duplicates: usize,
    pub conflicts: usize,
    pub missing_date: usize,
    pub move_failed: usize,
    /// (path, message) entries, ordered by source path.
    ///
    /// Conflicts, missing dates, and move failures count as errors;
    /// duplicates are a normal outcome and only appear in the counts.
    pub errors: Vec<(PathBuf, String)>,
}

impl RunReport {
    /// Build the report from the items' terminal states.
    ///
    /// Items are expected in source-path order (discovery sorts them),
    /// which keeps the error list deterministic.
    pub fn from_items(items: &[MediaItem]) -> Self {
        let mut report = RunReport {
            total: items.len(),
            ..RunReport::default()
        };

        for item in items {
            match item.outcome {
                Outcome::Pending => {}
                Outcome::Moved => report.moved += 1,
                Outcome::Duplicate => report.duplicates += 1,
                Outcome::Conflict => {
                    report.conflicts += 1;
                    report.push_error(item);
                }
                Outcome::MissingDate => {
                    report.missing_date += 1;
                    report.push_error(item);
                }
                Outcome::MoveFailed => {
                    report.move_failed += 1;
                    report.push_error(item);
                }
            }
        }

        report
    }

    fn push_error(&mut self, item: &MediaItem) {
        let message = item
            .note
            .clone()
            .unwrap_or_else(|| "unknown error".to_string());
        self.errors.push((item.source.clone(), message));
    }

    /// True when no error entries were accumulated
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Process exit code for this run
    pub fn exit_code(&self) -> i32 {
        if self.success() { 0 } else { 1 }
    }

    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Moved: {}, Duplicates: {}, Conflicts: {}, Missing date: {}, Failed: {}",
            self.total,
            self.moved,
            self.duplicates,
            self.conflicts,
            self.missing_date,
            self.move_failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;
    use std::path::PathBuf;

    fn item_with(outcome: Outcome, note: Option<&str>) -> MediaItem {
        let mut item = MediaItem::new(PathBuf::from("a.jpg"), "jpg".into(), MediaKind::Photo);
        item.outcome = outcome;
        item.note = note.map(|s| s.to_string());
        item
    }

    #[test]
    fn test_counts_and_errors() {
        let items = vec![
            item_with(Outcome::Moved, None),
            item_with(Outcome::Moved, None),
            item_with(Outcome::Duplicate, Some("duplicate of b.jpg")),
            item_with(Outcome::Conflict, Some("target exists")),
            item_with(Outcome::MissingDate, Some("no DateTimeOriginal")),
            item_with(Outcome::MoveFailed, Some("permission denied")),
        ];

        let report = RunReport::from_items(&items);
        assert_eq!(report.total, 6);
        assert_eq!(report.moved, 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.conflicts, 1);
        assert_eq!(report.missing_date, 1);
        assert_eq!(report.move_failed, 1);
        assert_eq!(report.errors.len(), 3);
        assert!(!report.success());
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_duplicates_are_not_errors() {
        let items = vec![
            item_with(Outcome::Moved, None),
            item_with(Outcome::Duplicate, Some("duplicate of b.jpg")),
        ];

        let report = RunReport::from_items(&items);
        assert!(report.success());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_summary_format() {
        let items = vec![item_with(Outcome::Moved, None)];
        let summary = RunReport::from_items(&items).summary();
        assert!(summary.contains("Total: 1"));
        assert!(summary.contains("Moved: 1"));
    }
}
