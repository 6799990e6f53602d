//! Pipeline orchestration
//!
//! Drives the stages in order: discovery, the immutable-flag gate, date
//! extraction, target planning, duplicate/conflict resolution, and
//! execution. Per-file problems become item outcomes; only discovery
//! failures and the flag gate abort the run.

use crate::config::Config;
use crate::discover;
use crate::error::Result;
use crate::execute;
use crate::extract::{ExifToolSource, FfprobeSource, MetadataSource};
use crate::flags;
use crate::media::{MediaItem, MediaKind, Outcome};
use crate::plan::plan_target;
use crate::resolve;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Orchestrates one organizing run
pub struct Pipeline {
    config: Config,
    photo_source: Box<dyn MetadataSource>,
    video_source: Box<dyn MetadataSource>,
}

impl Pipeline {
    /// Create a pipeline backed by the external tools (exiftool, ffprobe)
    pub fn new(config: Config) -> Self {
        let photo_source = Box::new(ExifToolSource::new(config.batch_size));
        Self::with_sources(config, photo_source, Box::new(FfprobeSource))
    }

    /// Create a pipeline with custom metadata sources (used by tests to
    /// avoid shelling out)
    pub fn with_sources(
        config: Config,
        photo_source: Box<dyn MetadataSource>,
        video_source: Box<dyn MetadataSource>,
    ) -> Self {
        if config.threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(config.threads)
                .build_global()
                .ok(); // Ignore if already initialized
        }

        Self {
            config,
            photo_source,
            video_source,
        }
    }

    /// Run the full pipeline and return every item with its terminal
    /// outcome, in source-path order.
    pub fn run(&mut self) -> Result<Vec<MediaItem>> {
        info!(source = %self.config.source_dir.display(), "Scanning source directory");
        let mut items = discover::discover(&self.config)?;
        info!(count = items.len(), "Found media files");

        if items.is_empty() {
            return Ok(items);
        }

        if self.config.skip_flag_check {
            debug!("Immutable flag check disabled");
        } else {
            flags::check_immutable_flags(&items, &self.config.source_dir)?;
        }

        self.extract_dates(&mut items)?;
        self.plan_targets(&mut items);

        let planned = items.iter().filter(|i| i.target.is_some()).count();
        let bar = progress_bar(planned as u64, "checking duplicates");
        resolve::collapse_within_run(&mut items, &|n| bar.inc(n as u64));
        bar.finish_and_clear();

        resolve::classify_targets(&mut items);

        if self.config.dry_run {
            info!("Dry run - no files will be moved");
        }
        execute::execute(&mut items, self.config.dry_run);

        Ok(items)
    }

    /// Extract capture dates, photos first, each kind through its own
    /// metadata source. A missing external tool is fatal only when files
    /// of that kind were actually discovered.
    fn extract_dates(&self, items: &mut [MediaItem]) -> Result<()> {
        for source in [&self.photo_source, &self.video_source] {
            let kind = source.kind();
            let indices: Vec<usize> = items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.kind == kind)
                .map(|(idx, _)| idx)
                .collect();

            if indices.is_empty() {
                continue;
            }

            source.ensure_available()?;

            let paths: Vec<PathBuf> = indices.iter().map(|&i| items[i].source.clone()).collect();
            let label = match kind {
                MediaKind::Photo => "extracting photo dates",
                MediaKind::Video => "extracting video dates",
            };

            let bar = progress_bar(paths.len() as u64, label);
            let dates = source.extract(&paths, &|n| bar.inc(n as u64));
            bar.finish_and_clear();

            if dates.len() != paths.len() {
                warn!(
                    expected = paths.len(),
                    got = dates.len(),
                    "Metadata source returned a short result; missing entries treated as date-missing"
                );
            }

            let missing_note = match kind {
                MediaKind::Photo => "no DateTimeOriginal found in EXIF metadata",
                MediaKind::Video => "no creation_time found in video metadata",
            };

            let mut dates = dates.into_iter();
            for &idx in &indices {
                match dates.next().flatten() {
                    Some(dt) => items[idx].date = Some(dt.date()),
                    None => items[idx].settle(Outcome::MissingDate, missing_note),
                }
            }
        }

        Ok(())
    }

    /// Compute target paths for every dated item; undated items are
    /// excluded from the move phase and left at their source.
    fn plan_targets(&self, items: &mut [MediaItem]) {
        for item in items.iter_mut() {
            if item.outcome != Outcome::Pending {
                continue;
            }
            match item.date {
                Some(date) => {
                    let file_name = item
                        .source
                        .file_name()
                        .unwrap_or_else(|| item.source.as_os_str());
                    item.target = Some(plan_target(
                        &self.config.target_dir,
                        date,
                        file_name,
                        &item.extension,
                        self.config.group_by_extension,
                    ));
                }
                None => item.settle(Outcome::MissingDate, "no capture date extracted"),
            }
        }
    }
}

fn progress_bar(len: u64, label: &str) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40}] {pos}/{len} ({percent}%) ETA {eta} {msg}")
            .unwrap(),
    );
    bar.set_message(label.to_string());
    bar
}
