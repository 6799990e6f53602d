//! Error types for the media archivist

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for archivist operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the media archivist
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to discover files under {path}: {message}")]
    Discovery { path: PathBuf, message: String },

    #[error(
        "{} file(s) under {} have an immutable flag set; run `chflags -R nouchg {}` and retry",
        .paths.len(),
        .source_root.display(),
        .source_root.display()
    )]
    ImmutableFiles {
        source_root: PathBuf,
        paths: Vec<PathBuf>,
    },

    #[error("exiftool not found. Please install ExifTool and ensure it is in PATH")]
    ExiftoolNotFound,

    #[error("ffprobe not found. Please install FFmpeg and ensure ffprobe is in PATH")]
    FfprobeNotFound,

    #[error("Failed to read metadata from {path}: {message}")]
    MetadataRead { path: PathBuf, message: String },

    #[error("File hash computation failed for {path}: {message}")]
    HashComputation { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}
