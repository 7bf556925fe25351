//! Credential persistence.
//!
//! The publish target hands back an opaque credential blob after its auth
//! flow; the store only persists and reloads it so a restarted process can
//! skip re-authentication. Refresh is the target's business.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{PublishError, PublishResult};

/// Opaque persisted credential blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Access token for the publish target
    pub access_token: String,

    /// Refresh token, when the target issued one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Access token expiry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credentials {
    /// True when the access token is past its expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| now >= at).unwrap_or(false)
    }
}

/// Credential persistence collaborator.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the stored credentials, if any.
    async fn load(&self) -> PublishResult<Option<Credentials>>;

    /// Persist credentials, replacing any previous blob.
    async fn store(&self, credentials: &Credentials) -> PublishResult<()>;
}

/// JSON-file credential store.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> PublishResult<Option<Credentials>> {
        match fs::read(&self.path).await {
            Ok(bytes) => {
                let creds = serde_json::from_slice(&bytes)
                    .map_err(|e| PublishError::credential_store(format!("corrupt blob: {e}")))?;
                Ok(Some(creds))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, credentials: &Credentials) -> PublishResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(credentials)?;
        fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn creds() -> Credentials {
        Credentials {
            access_token: "tok".into(),
            refresh_token: Some("refresh".into()),
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_load_missing_returns_none() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("creds.json"));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_and_reload() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested/creds.json"));

        store.store(&creds()).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, Some(creds()));
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("creds.json");
        fs::write(&path, b"not json").await.unwrap();

        let store = FileCredentialStore::new(&path);
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, PublishError::CredentialStore(_)));
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let mut c = creds();
        assert!(!c.is_expired(now));

        c.expires_at = Some(now - Duration::minutes(1));
        assert!(c.is_expired(now));

        c.expires_at = Some(now + Duration::minutes(1));
        assert!(!c.is_expired(now));
    }
}
