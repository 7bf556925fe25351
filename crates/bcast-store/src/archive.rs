//! Archive extraction collaborator.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

/// External archive collaborator: unpack an uploaded archive into a
/// session-owned directory.
#[async_trait]
pub trait AssetArchive: Send + Sync {
    /// Extract `archive` into `dest` (created if missing).
    async fn extract(&self, archive: &Path, dest: &Path) -> StoreResult<()>;
}

/// Default extractor shelling out to the `unzip` CLI.
#[derive(Debug, Clone, Default)]
pub struct UnzipExtractor;

#[async_trait]
impl AssetArchive for UnzipExtractor {
    async fn extract(&self, archive: &Path, dest: &Path) -> StoreResult<()> {
        if !archive.exists() {
            return Err(StoreError::FileNotFound(archive.to_path_buf()));
        }
        which::which("unzip").map_err(|_| StoreError::UnzipNotFound)?;

        tokio::fs::create_dir_all(dest).await?;

        debug!(
            "Extracting {} into {}",
            archive.display(),
            dest.display()
        );

        // -o: overwrite without prompting; -j: flatten archive-internal
        // directories so listing stays a flat path scan.
        let output = Command::new("unzip")
            .arg("-o")
            .arg("-j")
            .arg(archive)
            .arg("-d")
            .arg(dest)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(StoreError::extract_failed(
                format!("unzip exited with {:?}", output.status.code()),
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
            ));
        }

        info!("Extracted {} into {}", archive.display(), dest.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_extract_missing_archive_fails() {
        let dir = TempDir::new().unwrap();
        let err = UnzipExtractor
            .extract(&dir.path().join("missing.zip"), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::FileNotFound(_)));
    }
}
