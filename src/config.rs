//! Configuration types for the media archivist

use crate::error::{Error, Result};
use crate::media::MediaKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_batch_size() -> usize {
    50
}

fn default_photo_extensions() -> Vec<String> {
    vec![
        "jpg".into(),
        "jpeg".into(),
        "arw".into(),
        "sr2".into(),
        "raf".into(),
    ]
}

fn default_video_extensions() -> Vec<String> {
    vec!["mp4".into(), "mov".into()]
}

/// Configuration for an organizing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source directory containing media files
    pub source_dir: PathBuf,

    /// Target directory for organized files
    pub target_dir: PathBuf,

    /// Add an extension subdirectory below the date directory
    #[serde(default)]
    pub group_by_extension: bool,

    /// Number of photos submitted per exiftool invocation
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Skip the pre-flight immutable flag check
    #[serde(default)]
    pub skip_flag_check: bool,

    /// Dry run mode - classify everything, mutate nothing
    #[serde(default)]
    pub dry_run: bool,

    /// Number of threads for parallel processing (0 = auto)
    #[serde(default)]
    pub threads: usize,

    /// Verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Supported photo extensions
    #[serde(default = "default_photo_extensions")]
    pub photo_extensions: Vec<String>,

    /// Supported video extensions
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::new(),
            target_dir: PathBuf::new(),
            group_by_extension: false,
            batch_size: default_batch_size(),
            skip_flag_check: false,
            dry_run: false,
            threads: 0, // Auto-detect
            verbose: false,
            photo_extensions: default_photo_extensions(),
            video_extensions: default_video_extensions(),
        }
    }
}

impl Config {
    /// Check if a file extension is a supported photo format
    pub fn is_photo(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.photo_extensions.iter().any(|e| e == &ext_lower)
    }

    /// Check if a file extension is a supported video format
    pub fn is_video(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.video_extensions.iter().any(|e| e == &ext_lower)
    }

    /// Classify an extension, or None if it is not a media extension
    pub fn kind_for(&self, ext: &str) -> Option<MediaKind> {
        if self.is_photo(ext) {
            Some(MediaKind::Photo)
        } else if self.is_video(ext) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read '{}': {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("failed to parse '{}': {}", path.display(), e))
        })
    }

    /// Check that source and target are usable before the pipeline starts
    pub fn validate(&self) -> Result<()> {
        if self.source_dir.as_os_str().is_empty() {
            return Err(Error::Config("no source directory given".into()));
        }
        if self.target_dir.as_os_str().is_empty() {
            return Err(Error::Config("no target directory given".into()));
        }
        if !self.target_dir.is_dir() {
            return Err(Error::Config(format!(
                "target '{}' is not a directory",
                self.target_dir.display()
            )));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch size must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_extension_sets() {
        let config = Config::default();
        assert!(config.is_photo("jpg"));
        assert!(config.is_photo("JPG"));
        assert!(config.is_photo("arw"));
        assert!(config.is_video("mov"));
        assert!(config.is_video("MP4"));
        assert!(!config.is_photo("png"));
        assert!(!config.is_video("mkv"));
    }

    #[test]
    fn test_kind_for() {
        let config = Config::default();
        assert_eq!(config.kind_for("jpeg"), Some(MediaKind::Photo));
        assert_eq!(config.kind_for("mp4"), Some(MediaKind::Video));
        assert_eq!(config.kind_for("txt"), None);
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archivist.toml");
        std::fs::write(
            &path,
            r#"
source_dir = "/import"
target_dir = "/library"
group_by_extension = true
batch_size = 10
"#,
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.source_dir, PathBuf::from("/import"));
        assert!(config.group_by_extension);
        assert_eq!(config.batch_size, 10);
        // Defaults fill in unspecified fields
        assert!(config.is_photo("raf"));
        assert!(!config.dry_run);
    }

    #[test]
    fn test_validate_rejects_zero_batch() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config {
            source_dir: dir.path().to_path_buf(),
            target_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        config.batch_size = 0;
        assert!(config.validate().is_err());
    }
}
