//! Publish target interface and dry-run implementation.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

use crate::error::{PublishError, PublishResult};

/// Opaque handle returned by [`PublishTarget::authenticate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialHandle(pub String);

impl CredentialHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One publish call: an artifact plus its resolved listing data and the
/// scheduled go-live time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    /// Rendered video to upload
    pub video_path: PathBuf,

    /// Listing title
    pub title: String,

    /// Listing description
    pub description: String,

    /// Listing tags
    pub tags: Vec<String>,

    /// Scheduled publication time (UTC)
    pub publish_at: DateTime<Utc>,
}

impl PublishRequest {
    /// The wire format the publish target expects for scheduling.
    pub fn publish_at_iso8601(&self) -> String {
        self.publish_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Progress of a chunked upload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UploadProgress {
    /// Bytes uploaded so far
    pub bytes_sent: u64,
    /// Total upload size
    pub total_bytes: u64,
}

impl UploadProgress {
    /// Percentage uploaded, 0-100.
    pub fn percentage(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        (self.bytes_sent as f64 / self.total_bytes as f64) * 100.0
    }
}

/// Receipt for a completed publish call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishReceipt {
    /// Identifier assigned by the publish target
    pub remote_id: String,
    /// When the item goes live
    pub scheduled_at: DateTime<Utc>,
}

/// External publish collaborator. Upload is chunked and resumable on the
/// target side; progress is reported per chunk through the callback.
#[async_trait]
pub trait PublishTarget: Send + Sync {
    /// Authenticate against the target, reusing persisted credentials
    /// where possible.
    async fn authenticate(&self) -> PublishResult<CredentialHandle>;

    /// Upload one video with its listing data and scheduled time. Blocks
    /// until the upload completes.
    async fn publish(
        &self,
        handle: &CredentialHandle,
        request: &PublishRequest,
        progress: &(dyn Fn(UploadProgress) + Send + Sync),
    ) -> PublishResult<PublishReceipt>;
}

/// Publisher that goes through the motions without touching the network.
/// Used for local runs and tests.
#[derive(Clone)]
pub struct DryRunPublisher {
    chunk_bytes: u64,
    credentials: Option<std::sync::Arc<dyn crate::credentials::CredentialStore>>,
}

impl DryRunPublisher {
    pub fn new() -> Self {
        Self {
            chunk_bytes: 8 * 1024 * 1024,
            credentials: None,
        }
    }

    /// Override the simulated chunk size.
    pub fn with_chunk_bytes(mut self, chunk_bytes: u64) -> Self {
        self.chunk_bytes = chunk_bytes.max(1);
        self
    }

    /// Persist and reuse credentials through a store, mirroring the real
    /// target's token lifecycle.
    pub fn with_credential_store(
        mut self,
        store: std::sync::Arc<dyn crate::credentials::CredentialStore>,
    ) -> Self {
        self.credentials = Some(store);
        self
    }
}

impl Default for DryRunPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PublishTarget for DryRunPublisher {
    async fn authenticate(&self) -> PublishResult<CredentialHandle> {
        let Some(store) = &self.credentials else {
            return Ok(CredentialHandle("dry-run".to_string()));
        };

        if let Some(creds) = store.load().await? {
            if !creds.is_expired(Utc::now()) {
                info!("Reusing stored credentials");
                return Ok(CredentialHandle(creds.access_token));
            }
        }

        let fresh = crate::credentials::Credentials {
            access_token: format!("dry-token-{}", Uuid::new_v4()),
            refresh_token: None,
            expires_at: Some(Utc::now() + chrono::Duration::hours(1)),
        };
        store.store(&fresh).await?;
        info!("Stored fresh dry-run credentials");
        Ok(CredentialHandle(fresh.access_token))
    }

    async fn publish(
        &self,
        _handle: &CredentialHandle,
        request: &PublishRequest,
        progress: &(dyn Fn(UploadProgress) + Send + Sync),
    ) -> PublishResult<PublishReceipt> {
        let metadata = tokio::fs::metadata(&request.video_path)
            .await
            .map_err(|_| PublishError::FileNotFound(request.video_path.clone()))?;
        let total_bytes = metadata.len();

        let mut bytes_sent = 0;
        while bytes_sent < total_bytes {
            bytes_sent = (bytes_sent + self.chunk_bytes).min(total_bytes);
            progress(UploadProgress {
                bytes_sent,
                total_bytes,
            });
        }

        info!(
            "Dry-run publish of {} ({} bytes), scheduled at {}",
            request.video_path.display(),
            total_bytes,
            request.publish_at_iso8601()
        );

        Ok(PublishReceipt {
            remote_id: format!("dry-{}", Uuid::new_v4()),
            scheduled_at: request.publish_at,
        })
    }
}
