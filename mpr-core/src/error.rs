//! Error types for the MPR export pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the exporter.
///
/// Input shape gaps and geometric degeneracies are handled inline (defaults,
/// numeric correction, warnings) and never surface here; only boundary
/// failures do.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Output path is empty")]
    EmptyPath,

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid job description: {0}")]
    InvalidJob(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for exporter operations.
pub type Result<T> = std::result::Result<T, ExportError>;
