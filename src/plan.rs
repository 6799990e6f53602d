//! Target path computation
//!
//! A pure function of (date, filename, options): the same inputs always
//! produce the same target, independent of run order or batch size.

use chrono::NaiveDate;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Compute the destination for a media file organized under `target_root`.
///
/// Layout: `{target_root}/{YYYY}/{YYYY-MM-DD}/[{ext}/]{file_name}`, where
/// the extension segment is included only when grouping is enabled.
pub fn plan_target(
    target_root: &Path,
    date: NaiveDate,
    file_name: &OsStr,
    extension: &str,
    group_by_extension: bool,
) -> PathBuf {
    let mut dest = target_root.join(date.format("%Y").to_string());
    dest.push(date.format("%Y-%m-%d").to_string());
    if group_by_extension {
        dest.push(extension);
    }
    dest.push(file_name);
    dest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_plain_layout() {
        let target = plan_target(
            Path::new("/library"),
            date(2024, 3, 1),
            OsStr::new("photo1.jpg"),
            "jpg",
            false,
        );
        assert_eq!(target, PathBuf::from("/library/2024/2024-03-01/photo1.jpg"));
    }

    #[test]
    fn test_extension_grouping() {
        let target = plan_target(
            Path::new("/library"),
            date(2023, 12, 24),
            OsStr::new("clip.MOV"),
            "mov",
            true,
        );
        assert_eq!(target, PathBuf::from("/library/2023/2023-12-24/mov/clip.MOV"));
    }

    #[test]
    fn test_zero_padded_components() {
        let target = plan_target(
            Path::new("/t"),
            date(2024, 1, 5),
            OsStr::new("a.jpg"),
            "jpg",
            false,
        );
        assert_eq!(target, PathBuf::from("/t/2024/2024-01-05/a.jpg"));
    }

    #[test]
    fn test_referentially_transparent() {
        for _ in 0..3 {
            let a = plan_target(
                Path::new("/t"),
                date(2020, 6, 15),
                OsStr::new("x.arw"),
                "arw",
                true,
            );
            let b = plan_target(
                Path::new("/t"),
                date(2020, 6, 15),
                OsStr::new("x.arw"),
                "arw",
                true,
            );
            assert_eq!(a, b);
        }
    }
}
