//! Publish error types.

use std::path::PathBuf;
use thiserror::Error;

pub type PublishResult<T> = Result<T, PublishError>;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Not authenticated with the publish target")]
    Unauthenticated,

    #[error("Credential store error: {0}")]
    CredentialStore(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Video file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PublishError {
    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }

    pub fn credential_store(msg: impl Into<String>) -> Self {
        Self::CredentialStore(msg.into())
    }

    /// Transient errors worth retrying with backoff. Auth and quota
    /// problems need user action instead.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PublishError::UploadFailed(_) | PublishError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryability() {
        assert!(PublishError::upload_failed("timeout").is_retryable());
        assert!(!PublishError::Unauthenticated.is_retryable());
        assert!(!PublishError::QuotaExceeded("daily limit".into()).is_retryable());
    }
}
