//! Session configuration.

use std::path::PathBuf;

use bcast_media::OutputFrame;

/// Configuration for the session service.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base directory for session working areas
    pub work_dir: PathBuf,
    /// Canonical output frame for every rendered video
    pub frame: OutputFrame,
    /// Timeout for a single mux invocation
    pub mux_timeout_secs: u64,
    /// Maximum retries for a single publish call
    pub max_publish_retries: u32,
    /// Base delay for publish retry backoff, in milliseconds
    pub publish_retry_base_ms: u64,
    /// Where the persisted credential blob lives
    pub credentials_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("/tmp/bcast"),
            frame: OutputFrame::Wide,
            mux_timeout_secs: 600,
            max_publish_retries: 3,
            publish_retry_base_ms: 500,
            credentials_path: PathBuf::from("/tmp/bcast/credentials.json"),
        }
    }
}

impl SessionConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            work_dir: std::env::var("BCAST_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            frame: match std::env::var("BCAST_FRAME").as_deref() {
                Ok("tall") => OutputFrame::Tall,
                _ => OutputFrame::Wide,
            },
            mux_timeout_secs: std::env::var("BCAST_MUX_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.mux_timeout_secs),
            max_publish_retries: std::env::var("BCAST_MAX_PUBLISH_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_publish_retries),
            publish_retry_base_ms: std::env::var("BCAST_PUBLISH_RETRY_BASE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.publish_retry_base_ms),
            credentials_path: std::env::var("BCAST_CREDENTIALS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.credentials_path),
        }
    }
}
