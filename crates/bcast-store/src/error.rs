//! Store error types.

use std::path::PathBuf;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unzip not found in PATH")]
    UnzipNotFound,

    #[error("Archive extraction failed: {message}")]
    ExtractFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn extract_failed(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ExtractFailed {
            message: message.into(),
            stderr,
        }
    }
}
