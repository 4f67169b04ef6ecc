use std::path::PathBuf;
use thiserror::Error;

use crate::check::CheckReport;

/// The main error type for lgbox operations.
#[derive(Debug, Error)]
pub enum LgboxError {
    #[error("Failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file not found at {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to parse config {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("Failed to read label-graph file {}: {source}", path.display())]
    LgRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON from {}: {source}", path.display())]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write JSON to {}: {source}", path.display())]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Image error for {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to list directory {}: {source}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("No .lg files found in {}", dir.display())]
    NoLabelGraphFiles { dir: PathBuf },

    #[error("Check failed with {error_count} error(s) and {warning_count} warning(s)")]
    CheckFailed {
        error_count: usize,
        warning_count: usize,
        report: CheckReport,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
