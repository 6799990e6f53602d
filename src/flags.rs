//! Pre-flight check for OS-level immutable flags
//!
//! Files imported from some devices arrive with the user-immutable flag
//! set, which makes every later move fail. Detecting this up front turns
//! hundreds of per-file failures into one actionable abort.

use crate::error::{Error, Result};
use crate::media::MediaItem;
use crate::os;
use std::path::Path;
use tracing::{debug, warn};

/// Population threshold above which only a sample is checked
const FULL_CHECK_LIMIT: usize = 1000;

/// Sample size used for large populations
const SAMPLE: usize = 100;

/// Number of files to examine for a population of the given size.
///
/// Small trees are checked exhaustively; larger ones get a bounded
/// sample, which still catches whole-tree flags set during device
/// import while keeping pre-flight latency constant.
pub fn sample_size(population: usize) -> usize {
    if population < FULL_CHECK_LIMIT {
        population
    } else {
        SAMPLE
    }
}

/// Scan (a sample of) the discovered files for immutable flags.
///
/// Returns `Error::ImmutableFiles` with the affected paths if any
/// sampled file is flagged; the pipeline aborts before extraction.
pub fn check_immutable_flags(items: &[MediaItem], source_root: &Path) -> Result<()> {
    let n = sample_size(items.len());
    let mut flagged = Vec::new();

    for item in items.iter().take(n) {
        match os::is_immutable(&item.source) {
            Ok(true) => flagged.push(item.source.clone()),
            Ok(false) => {}
            // Skip files we can't stat; the move phase will report them
            Err(e) => warn!(path = %item.source.display(), error = %e, "Could not stat file during flag check"),
        }
    }

    if flagged.is_empty() {
        debug!(checked = n, total = items.len(), "No immutable flags found");
        Ok(())
    } else {
        for path in &flagged {
            warn!(path = %path.display(), "File has an immutable flag set");
        }
        Err(Error::ImmutableFiles {
            source_root: source_root.to_path_buf(),
            paths: flagged,
        })
    }
}
