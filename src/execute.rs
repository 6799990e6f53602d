//! Move execution
//!
//! The only stage that mutates the filesystem. Fresh items are moved
//! (rename, with a copy-then-delete fallback across volumes), duplicate
//! sources are removed, everything else is left untouched. In dry-run
//! mode outcomes are assigned but nothing on disk changes.

use crate::error::Result;
use crate::media::{MediaItem, Outcome};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, error, info};

/// Execute (or simulate) the planned moves and duplicate cleanups.
pub fn execute(items: &mut [MediaItem], dry_run: bool) {
    for item in items.iter_mut() {
        match item.outcome {
            Outcome::Pending => {
                let Some(target) = item.target.clone() else {
                    continue;
                };
                if dry_run {
                    debug!(source = %item.source.display(), target = %target.display(), "Would move");
                    item.outcome = Outcome::Moved;
                    continue;
                }
                match move_file(&item.source, &target) {
                    Ok(()) => {
                        info!(source = %item.source.display(), target = %target.display(), "Moved");
                        item.outcome = Outcome::Moved;
                    }
                    Err(e) => {
                        error!(source = %item.source.display(), error = %e, "Move failed");
                        item.settle(Outcome::MoveFailed, e.to_string());
                    }
                }
            }
            Outcome::Duplicate => {
                if dry_run {
                    debug!(source = %item.source.display(), "Would remove duplicate");
                    continue;
                }
                if let Err(e) = fs::remove_file(&item.source) {
                    error!(source = %item.source.display(), error = %e, "Failed to remove duplicate");
                    item.settle(Outcome::MoveFailed, format!("failed to remove duplicate: {}", e));
                } else {
                    info!(source = %item.source.display(), "Removed duplicate");
                }
            }
            // Conflicts and missing dates are report-only
            _ => {}
        }
    }
}

/// Move a file with rename semantics, falling back to copy-then-delete
/// across volumes.
///
/// The fallback never leaves the file in neither location: a failed copy
/// removes the partial target and keeps the source, and the source is
/// deleted only once the copy has fully landed.
fn move_file(source: &Path, target: &Path) -> Result<()> {
    if source == target {
        return Ok(());
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    if fs::rename(source, target).is_ok() {
        return Ok(());
    }

    if let Err(e) = copy_file(source, target) {
        let _ = fs::remove_file(target);
        return Err(e);
    }

    // Preserve modification time across the copy
    if let Ok(metadata) = fs::metadata(source)
        && let Ok(mtime) = metadata.modified()
    {
        let _ = filetime::set_file_mtime(target, filetime::FileTime::from_system_time(mtime));
    }

    fs::remove_file(source)?;
    Ok(())
}

/// Copy file with buffered I/O for efficiency
fn copy_file(source: &Path, target: &Path) -> Result<()> {
    let src_file = File::open(source)?;
    let dest_file = File::create(target)?;

    let mut reader = BufReader::with_capacity(256 * 1024, src_file);
    let mut writer = BufWriter::with_capacity(256 * 1024, dest_file);

    let mut buffer = vec![0u8; 256 * 1024];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        writer.write_all(&buffer[..bytes_read])?;
    }

    writer.flush()?;
    Ok(())
}
