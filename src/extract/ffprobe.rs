//! Per-item video date extraction via ffprobe
//!
//! ffprobe has no batched multi-file mode, so each video costs one
//! invocation. Queries run in parallel; result order stays aligned with
//! the input order.

use crate::error::{Error, Result};
use crate::extract::MetadataSource;
use crate::media::MediaKind;
use chrono::NaiveDateTime;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use tracing::debug;

/// Metadata keys to try for creation date
const CREATION_DATE_KEYS: &[&str] = &["creation_time", "com.apple.quicktime.creationdate"];

/// Cached ffprobe availability check
static FFPROBE_AVAILABLE: OnceLock<bool> = OnceLock::new();

fn is_ffprobe_available() -> bool {
    *FFPROBE_AVAILABLE.get_or_init(|| Command::new("ffprobe").arg("-version").output().is_ok())
}

/// ffprobe-backed metadata source for videos
pub struct FfprobeSource;

impl MetadataSource for FfprobeSource {
    fn kind(&self) -> MediaKind {
        MediaKind::Video
    }

    fn ensure_available(&self) -> Result<()> {
        if is_ffprobe_available() {
            Ok(())
        } else {
            Err(Error::FfprobeNotFound)
        }
    }

    fn extract(
        &self,
        paths: &[PathBuf],
        progress: &(dyn Fn(usize) + Sync),
    ) -> Vec<Option<NaiveDateTime>> {
        paths
            .par_iter()
            .map(|path| {
                let date = match extract_one(path) {
                    Ok(dt) => Some(dt),
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "No video creation time");
                        None
                    }
                };
                progress(1);
                date
            })
            .collect()
    }
}

/// Query one video file's container metadata
fn extract_one(path: &Path) -> Result<NaiveDateTime> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| Error::MetadataRead {
            path: path.to_path_buf(),
            message: format!("failed to execute ffprobe: {}", e),
        })?;

    if !output.status.success() {
        return Err(Error::MetadataRead {
            path: path.to_path_buf(),
            message: format!("ffprobe failed: {}", String::from_utf8_lossy(&output.stderr)),
        });
    }

    parse_probe_output(&output.stdout).ok_or_else(|| Error::MetadataRead {
        path: path.to_path_buf(),
        message: "no creation time found in video metadata".to_string(),
    })
}

/// Pull a creation timestamp out of ffprobe's JSON, checking format tags
/// first and falling back to per-stream tags
fn parse_probe_output(stdout: &[u8]) -> Option<NaiveDateTime> {
    let json: serde_json::Value = serde_json::from_slice(stdout).ok()?;

    if let Some(tags) = json.get("format").and_then(|f| f.get("tags"))
        && let Some(dt) = date_from_tags(tags)
    {
        return Some(dt);
    }

    if let Some(streams) = json.get("streams").and_then(|s| s.as_array()) {
        for stream in streams {
            if let Some(tags) = stream.get("tags")
                && let Some(dt) = date_from_tags(tags)
            {
                return Some(dt);
            }
        }
    }

    None
}

fn date_from_tags(tags: &serde_json::Value) -> Option<NaiveDateTime> {
    for key in CREATION_DATE_KEYS {
        for tag_key in [*key, &key.to_uppercase()] {
            if let Some(value) = tags.get(tag_key).and_then(|v| v.as_str())
                && let Some(dt) = parse_video_datetime(value)
            {
                return Some(dt);
            }
        }
    }
    None
}

/// Parse the ISO-8601-ish timestamps found in container metadata
fn parse_video_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    // Full RFC 3339 with offset ("2024-01-15T14:30:00.000000Z")
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    // Without offset
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    None
}
