//! CLI argument parsing with clap

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Media Archivist - organize photos and videos by capture date
///
/// Moves media files into a TARGET/YYYY/YYYY-MM-DD directory layout,
/// reading capture dates from EXIF metadata (photos, batched through
/// exiftool) and container metadata (videos, via ffprobe). Duplicates
/// and conflicts are detected by content comparison and never clobber
/// existing files.
#[derive(Parser, Debug)]
#[command(name = "media-archivist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source directory containing media files
    pub source: Option<PathBuf>,

    /// Target directory for organized files
    pub target: Option<PathBuf>,

    /// Path to configuration file (TOML format)
    ///
    /// When specified, settings from the config file are used as defaults.
    /// CLI arguments will override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Dry run mode - show what would be done without moving files
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Group files by extension within date folders
    #[arg(long, conflicts_with = "no_ext")]
    pub ext: bool,

    /// Do not group files by extension (the default)
    #[arg(long)]
    pub no_ext: bool,

    /// Number of photos per exiftool batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Skip the pre-flight immutable flag check
    #[arg(long)]
    pub skip_flag_check: bool,

    /// Number of threads for parallel processing (0 = auto)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Additionally write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref source) = self.source {
            config.source_dir = source.clone();
        }
        if let Some(ref target) = self.target {
            config.target_dir = target.clone();
        }
        if self.ext {
            config.group_by_extension = true;
        }
        if self.no_ext {
            config.group_by_extension = false;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if self.skip_flag_check {
            config.skip_flag_check = true;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }
}
