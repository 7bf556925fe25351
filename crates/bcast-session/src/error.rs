//! Session error types.

use thiserror::Error;

use crate::session::SessionState;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("'{action}' is not valid while the session is {state:?}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
    },

    #[error("No audio or image assets collected yet")]
    NoAssets,

    #[error("Audio and image counts differ: {audio} audio vs {images} images")]
    CountMismatch { audio: usize, images: usize },

    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("Media error: {0}")]
    Media(#[from] bcast_media::MediaError),

    #[error("Store error: {0}")]
    Store(#[from] bcast_store::StoreError),

    #[error("Publish error: {0}")]
    Publish(#[from] bcast_publish::PublishError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SessionError {
    pub fn invalid_state(action: &'static str, state: SessionState) -> Self {
        Self::InvalidState { action, state }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// User input errors are reported and leave the session state
    /// unchanged; everything else is an operational failure.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidState { .. }
                | SessionError::NoAssets
                | SessionError::CountMismatch { .. }
                | SessionError::UnsupportedFile(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_classification() {
        assert!(SessionError::NoAssets.is_user_error());
        assert!(SessionError::CountMismatch { audio: 2, images: 3 }.is_user_error());
        assert!(!SessionError::internal("boom").is_user_error());
    }
}
