//! Recursive discovery of candidate media files

use crate::config::Config;
use crate::error::{Error, Result};
use crate::media::MediaItem;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Walk the source tree and collect media files, classified by extension.
///
/// Unmatched extensions are silently excluded. The returned items are
/// sorted by source path so every downstream stage and the final report
/// are deterministic. A missing or unreadable source root is fatal.
pub fn discover(config: &Config) -> Result<Vec<MediaItem>> {
    let root = &config.source_dir;
    probe_root(root)?;

    let mut items = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let ext_lower = ext.to_lowercase();

        if let Some(kind) = config.kind_for(&ext_lower) {
            items.push(MediaItem::new(path.to_path_buf(), ext_lower, kind));
        }
    }

    items.sort_by(|a, b| a.source.cmp(&b.source));
    debug!(count = items.len(), root = %root.display(), "Discovered media files");

    Ok(items)
}

/// Verify the source root exists and is readable before walking it
fn probe_root(root: &Path) -> Result<()> {
    if !root.is_dir() {
        return Err(Error::Discovery {
            path: root.to_path_buf(),
            message: "not a directory".into(),
        });
    }

    std::fs::read_dir(root).map_err(|e| Error::Discovery {
        path: root.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}
