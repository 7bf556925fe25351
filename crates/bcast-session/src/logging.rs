//! Structured session logging utilities.

use tracing::{error, info, warn};

use bcast_models::SessionId;

/// Session logger for structured logging with consistent formatting.
#[derive(Debug, Clone)]
pub struct SessionLogger {
    session_id: String,
    stage: String,
}

impl SessionLogger {
    /// Create a new logger for a session stage (e.g. "assembly",
    /// "publishing").
    pub fn new(session_id: &SessionId, stage: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            stage: stage.to_string(),
        }
    }

    /// Log the start of a stage.
    pub fn log_start(&self, message: &str) {
        info!(
            session_id = %self.session_id,
            stage = %self.stage,
            "Started: {}", message
        );
    }

    /// Log a warning.
    pub fn log_warning(&self, message: &str) {
        warn!(
            session_id = %self.session_id,
            stage = %self.stage,
            "Warning: {}", message
        );
    }

    /// Log an error.
    pub fn log_error(&self, message: &str) {
        error!(
            session_id = %self.session_id,
            stage = %self.stage,
            "Error: {}", message
        );
    }

    /// Log the completion of a stage.
    pub fn log_completion(&self, message: &str) {
        info!(
            session_id = %self.session_id,
            stage = %self.stage,
            "Completed: {}", message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_creation() {
        let id = SessionId::from_string("chat-1");
        let logger = SessionLogger::new(&id, "assembly");
        assert_eq!(logger.session_id, "chat-1");
        assert_eq!(logger.stage, "assembly");
    }
}
