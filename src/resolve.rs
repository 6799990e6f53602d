//! Duplicate and conflict classification
//!
//! Two passes over the planned items:
//!
//! 1. Within-run collapse: content-identical source files are grouped by
//!    hash and only the cleanest-named one keeps its move; the rest
//!    become duplicates.
//! 2. Against-target classification: a planned move is fresh when the
//!    target is vacant, a duplicate when the occupant is byte-identical,
//!    and a conflict otherwise.
//!
//! Neither pass mutates the filesystem.

use crate::hash::{compute_file_hash, files_identical};
use crate::media::{MediaItem, Outcome};
use rayon::prelude::*;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Patterns that indicate a file is a copy/duplicate (lower priority)
static COPY_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn copy_patterns() -> &'static Vec<Regex> {
    COPY_PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"(?i)[- _]copy").unwrap(),
            Regex::new(r"_\d+$").unwrap(),
            Regex::new(r" \d+$").unwrap(),
            Regex::new(r"\(\d+\)$").unwrap(),
        ]
    })
}

/// Calculate filename priority score (lower = better/cleaner filename).
///
/// Primary factor is stem length, since originals don't carry copy
/// suffixes; known copy markers add a penalty to break ties.
pub fn filename_priority_score(path: &Path) -> u32 {
    let stem = match path.file_stem().and_then(|s| s.to_str()) {
        Some(name) => name,
        None => return u32::MAX,
    };

    let length_score = stem.len() as u32;

    let mut copy_penalty = 0u32;
    for pattern in copy_patterns().iter() {
        if pattern.is_match(stem) {
            copy_penalty += 1000;
        }
    }

    length_score + copy_penalty
}

/// Collapse content-identical source files discovered in this run.
///
/// Planned items are hashed in parallel, grouped, and each group keeps
/// one item: a file already sitting at its canonical target wins,
/// otherwise the cleanest filename does. Hash matches are confirmed
/// byte-for-byte before anything is declared a duplicate.
pub fn collapse_within_run(items: &mut [MediaItem], progress: &(dyn Fn(usize) + Sync)) {
    let candidates: Vec<(usize, PathBuf)> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.outcome == Outcome::Pending && item.target.is_some())
        .map(|(idx, item)| (idx, item.source.clone()))
        .collect();

    let hashes: Vec<(usize, Option<u64>)> = candidates
        .par_iter()
        .map(|(idx, source)| {
            let hash = match compute_file_hash(source) {
                Ok(h) => Some(h),
                Err(e) => {
                    warn!(path = %source.display(), error = %e, "Could not hash file, skipping duplicate check");
                    None
                }
            };
            progress(1);
            (*idx, hash)
        })
        .collect();

    let mut groups: HashMap<u64, Vec<usize>> = HashMap::new();
    for (idx, hash) in hashes {
        if let Some(hash) = hash {
            groups.entry(hash).or_default().push(idx);
        }
    }

    for (_, mut group) in groups {
        if group.len() < 2 {
            continue;
        }

        // Files already at their canonical location win outright; after
        // that the cleanest filename does. Path order breaks remaining
        // ties so results don't depend on hash-map iteration.
        group.sort_by_cached_key(|&idx| {
            let item = &items[idx];
            let in_place = item.target.as_deref() == Some(item.source.as_path());
            (
                !in_place,
                filename_priority_score(&item.source),
                item.source.clone(),
            )
        });

        let kept_source = items[group[0]].source.clone();
        for &idx in &group[1..] {
            match files_identical(&kept_source, &items[idx].source) {
                Ok(true) => {
                    debug!(
                        kept = %kept_source.display(),
                        duplicate = %items[idx].source.display(),
                        "Collapsing within-run duplicate"
                    );
                    items[idx].settle(
                        Outcome::Duplicate,
                        format!("duplicate of {}", kept_source.display()),
                    );
                }
                // Hash collision: the files genuinely differ, keep both
                Ok(false) => {}
                Err(e) => {
                    warn!(path = %items[idx].source.display(), error = %e, "Could not compare files, keeping both");
                }
            }
        }
    }
}

/// Classify each remaining planned move against the target tree.
///
/// A source already located at its computed target is neither a
/// duplicate nor a conflict against itself; its move is a no-op and
/// re-running over an organized tree stays safe.
pub fn classify_targets(items: &mut [MediaItem]) {
    // target -> first source that claimed it this run
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

    for i in 0..items.len() {
        if items[i].outcome != Outcome::Pending {
            continue;
        }
        let Some(target) = items[i].target.clone() else {
            continue;
        };
        let source = items[i].source.clone();

        if source == target {
            claimed.insert(target, source);
            continue;
        }

        if let Some(first) = claimed.get(&target) {
            // Identical-content sources were collapsed already, so two
            // claimants for one path is a genuine clash.
            items[i].settle(
                Outcome::Conflict,
                format!(
                    "target {} already claimed by {}",
                    target.display(),
                    first.display()
                ),
            );
            continue;
        }

        if let Some(parent) = target.parent()
            && parent.is_file()
        {
            items[i].settle(
                Outcome::Conflict,
                format!("target directory {} is a file", parent.display()),
            );
            continue;
        }

        if target.exists() {
            match files_identical(&source, &target) {
                Ok(true) => items[i].settle(
                    Outcome::Duplicate,
                    format!("identical copy already at {}", target.display()),
                ),
                Ok(false) => items[i].settle(
                    Outcome::Conflict,
                    format!("target {} exists with different contents", target.display()),
                ),
                Err(e) => items[i].settle(
                    Outcome::Conflict,
                    format!("could not compare with {}: {}", target.display(), e),
                ),
            }
            continue;
        }

        claimed.insert(target, source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;
    use std::fs;
    use std::path::Path;

    fn planned_item(source: &Path, target: &Path) -> MediaItem {
        let mut item = MediaItem::new(source.to_path_buf(), "jpg".into(), MediaKind::Photo);
        item.target = Some(target.to_path_buf());
        item
    }

    #[test]
    fn test_filename_priority_score() {
        let clean = Path::new("IMG_1234.jpg");
        let copy_suffix = Path::new("IMG_1234_1.jpg");
        let copy_word = Path::new("IMG_1234 copy.jpg");
        let copy_paren = Path::new("IMG_1234(1).jpg");

        let score_clean = filename_priority_score(clean);
        assert!(score_clean < filename_priority_score(copy_suffix));
        assert!(score_clean < filename_priority_score(copy_word));
        assert!(score_clean < filename_priority_score(copy_paren));
    }

    #[test]
    fn test_collapse_keeps_cleanest_name() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("photo1.jpg");
        let b = dir.path().join("photo1_copy.jpg");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();

        let target_root = dir.path().join("out");
        let mut items = vec![
            planned_item(&a, &target_root.join("photo1.jpg")),
            planned_item(&b, &target_root.join("photo1_copy.jpg")),
        ];

        collapse_within_run(&mut items, &|_| {});

        assert_eq!(items[0].outcome, Outcome::Pending);
        assert_eq!(items[1].outcome, Outcome::Duplicate);
        assert!(items[1].note.as_deref().unwrap().contains("photo1.jpg"));
    }

    #[test]
    fn test_collapse_leaves_distinct_content_alone() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");
        fs::write(&a, b"content A").unwrap();
        fs::write(&b, b"content B").unwrap();

        let out = dir.path().join("out");
        let mut items = vec![
            planned_item(&a, &out.join("a.jpg")),
            planned_item(&b, &out.join("b.jpg")),
        ];

        collapse_within_run(&mut items, &|_| {});
        assert!(items.iter().all(|i| i.outcome == Outcome::Pending));
    }

    #[test]
    fn test_collapse_prefers_file_already_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let organized = dir.path().join("2024-03-01");
        fs::create_dir_all(&organized).unwrap();
        let in_place = organized.join("zzzz_long_name.jpg");
        let incoming = dir.path().join("a.jpg");
        fs::write(&in_place, b"same").unwrap();
        fs::write(&incoming, b"same").unwrap();

        let mut items = vec![
            planned_item(&incoming, &organized.join("a.jpg")),
            planned_item(&in_place, &in_place),
        ];

        collapse_within_run(&mut items, &|_| {});

        // The organized copy wins despite its longer name
        assert_eq!(items[0].outcome, Outcome::Duplicate);
        assert_eq!(items[1].outcome, Outcome::Pending);
    }

    #[test]
    fn test_classify_fresh_when_target_vacant() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.jpg");
        fs::write(&source, b"x").unwrap();

        let mut items = vec![planned_item(&source, &dir.path().join("out/a.jpg"))];
        classify_targets(&mut items);
        assert_eq!(items[0].outcome, Outcome::Pending);
    }

    #[test]
    fn test_classify_duplicate_against_identical_target() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.jpg");
        let target = dir.path().join("out/a.jpg");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&source, b"same").unwrap();
        fs::write(&target, b"same").unwrap();

        let mut items = vec![planned_item(&source, &target)];
        classify_targets(&mut items);
        assert_eq!(items[0].outcome, Outcome::Duplicate);
    }

    #[test]
    fn test_classify_conflict_against_different_target() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.jpg");
        let target = dir.path().join("out/a.jpg");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&source, b"mine").unwrap();
        fs::write(&target, b"theirs").unwrap();

        let mut items = vec![planned_item(&source, &target)];
        classify_targets(&mut items);
        assert_eq!(items[0].outcome, Outcome::Conflict);
    }

    #[test]
    fn test_classify_source_at_canonical_path_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("2024/2024-03-01/a.jpg");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, b"x").unwrap();

        let mut items = vec![planned_item(&target, &target)];
        classify_targets(&mut items);
        // Neither duplicate nor conflict against itself
        assert_eq!(items[0].outcome, Outcome::Pending);
    }

    #[test]
    fn test_classify_conflict_when_target_parent_is_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.jpg");
        fs::write(&source, b"x").unwrap();
        let bogus_dir = dir.path().join("2024");
        fs::write(&bogus_dir, b"i am a file").unwrap();

        let mut items = vec![planned_item(&source, &bogus_dir.join("a.jpg"))];
        classify_targets(&mut items);
        assert_eq!(items[0].outcome, Outcome::Conflict);
    }

    #[test]
    fn test_classify_conflict_between_two_claimants() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("x/a.jpg");
        let b = dir.path().join("y/a.jpg");
        fs::create_dir_all(a.parent().unwrap()).unwrap();
        fs::create_dir_all(b.parent().unwrap()).unwrap();
        fs::write(&a, b"first").unwrap();
        fs::write(&b, b"second").unwrap();

        let target = dir.path().join("out/a.jpg");
        let mut items = vec![planned_item(&a, &target), planned_item(&b, &target)];
        classify_targets(&mut items);

        assert_eq!(items[0].outcome, Outcome::Pending);
        assert_eq!(items[1].outcome, Outcome::Conflict);
    }
}
