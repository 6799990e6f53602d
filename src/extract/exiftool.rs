//! Batched photo date extraction via exiftool
//!
//! Process startup dominates exiftool's cost on small files, so photos
//! are submitted in batches of `batch_size` paths per invocation. Each
//! JSON record is keyed back to its input path through `SourceFile`;
//! records without a `DateTimeOriginal` mark that one file date-missing
//! without affecting the rest of the batch.

use crate::error::{Error, Result};
use crate::extract::MetadataSource;
use crate::media::MediaKind;
use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Expected shape of an EXIF timestamp before parsing
static EXIF_TIMESTAMP: OnceLock<Regex> = OnceLock::new();

fn exif_timestamp_pattern() -> &'static Regex {
    EXIF_TIMESTAMP
        .get_or_init(|| Regex::new(r"^\d{4}:\d{2}:\d{2} \d{2}:\d{2}:\d{2}").unwrap())
}

/// Cached exiftool availability check
static EXIFTOOL_AVAILABLE: OnceLock<bool> = OnceLock::new();

fn is_exiftool_available() -> bool {
    *EXIFTOOL_AVAILABLE.get_or_init(|| {
        Command::new("exiftool")
            .arg("-ver")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    })
}

/// Batched exiftool-backed metadata source for photos
pub struct ExifToolSource {
    batch_size: usize,
}

impl ExifToolSource {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }
}

impl MetadataSource for ExifToolSource {
    fn kind(&self) -> MediaKind {
        MediaKind::Photo
    }

    fn ensure_available(&self) -> Result<()> {
        if is_exiftool_available() {
            Ok(())
        } else {
            Err(Error::ExiftoolNotFound)
        }
    }

    fn extract(
        &self,
        paths: &[PathBuf],
        progress: &(dyn Fn(usize) + Sync),
    ) -> Vec<Option<NaiveDateTime>> {
        let mut dates = Vec::with_capacity(paths.len());
        for batch in paths.chunks(self.batch_size) {
            dates.extend(extract_batch(batch));
            progress(batch.len());
        }
        dates
    }
}

/// Run one exiftool invocation for a batch of photo paths
fn extract_batch(batch: &[PathBuf]) -> Vec<Option<NaiveDateTime>> {
    let output = Command::new("exiftool")
        .args(["-json", "-DateTimeOriginal"])
        .args(batch)
        .output();

    let output = match output {
        Ok(o) => o,
        Err(e) => {
            warn!(error = %e, files = batch.len(), "Failed to execute exiftool, marking batch date-missing");
            return vec![None; batch.len()];
        }
    };

    // exiftool exits non-zero when any file in the batch had problems
    // but still emits records for the rest, so parse stdout regardless.
    if !output.status.success() {
        debug!(
            status = %output.status,
            stderr = %String::from_utf8_lossy(&output.stderr),
            "exiftool reported errors for this batch"
        );
    }

    parse_batch_output(&output.stdout, batch)
}

/// Map exiftool's JSON array back onto the input paths, in input order
fn parse_batch_output(stdout: &[u8], batch: &[PathBuf]) -> Vec<Option<NaiveDateTime>> {
    let records: Vec<serde_json::Value> = match serde_json::from_slice(stdout) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Could not parse exiftool JSON output, marking batch date-missing");
            return vec![None; batch.len()];
        }
    };

    let mut by_source: HashMap<String, Option<NaiveDateTime>> = HashMap::new();
    for record in &records {
        let Some(source) = record.get("SourceFile").and_then(|v| v.as_str()) else {
            continue;
        };
        let date = record
            .get("DateTimeOriginal")
            .and_then(|v| v.as_str())
            .and_then(parse_exif_datetime);
        by_source.insert(source.to_string(), date);
    }

    batch
        .iter()
        .map(|path| {
            by_source
                .get(path.to_string_lossy().as_ref())
                .copied()
                .flatten()
        })
        .collect()
}

/// Parse an EXIF timestamp string: "YYYY:MM:DD HH:MM:SS", possibly with
/// subseconds or a trailing offset
fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if !exif_timestamp_pattern().is_match(s) {
        return None;
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S%.f") {
        return Some(dt);
    }
    // Some cameras append an offset; the leading 19 characters are
    // already validated, so parse just those.
    NaiveDateTime::parse_from_str(&s[..19], "%Y:%m:%d %H:%M:%S").ok()
}
