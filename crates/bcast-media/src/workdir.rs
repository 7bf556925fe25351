//! Session-scoped working directories.
//!
//! Every session gets its own tree under the configured base directory:
//! downloaded audio, downloaded images and rendered output are kept apart
//! so cleanup can remove everything a session owns in one pass.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use bcast_models::SessionId;

use crate::error::MediaResult;

/// Working area owned by one batch session.
#[derive(Debug, Clone)]
pub struct SessionWorkdir {
    root: PathBuf,
}

impl SessionWorkdir {
    /// Create the working area for a session under `base`, including all
    /// subdirectories.
    pub async fn create(base: impl AsRef<Path>, session_id: &SessionId) -> MediaResult<Self> {
        let root = base.as_ref().join(session_id.as_str());
        let workdir = Self { root };
        for dir in [workdir.audio_dir(), workdir.image_dir(), workdir.output_dir()] {
            fs::create_dir_all(&dir).await?;
        }
        Ok(workdir)
    }

    /// Session root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for uploaded audio files.
    pub fn audio_dir(&self) -> PathBuf {
        self.root.join("audio")
    }

    /// Directory for uploaded images (and extracted archives).
    pub fn image_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    /// Directory for rendered artifacts.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    /// Path for the normalized image of pair `index` (1-based).
    pub fn normalized_image_path(&self, index: usize) -> PathBuf {
        self.output_dir().join(format!("proc_img_{index}.jpg"))
    }

    /// Path for the rendered video of pair `index` (1-based).
    pub fn artifact_path(&self, index: usize) -> PathBuf {
        self.output_dir().join(format!("video_{index}.mp4"))
    }

    /// Remove the whole session tree. Best effort; a failure is logged and
    /// swallowed so teardown never blocks session completion.
    pub async fn cleanup(&self) {
        if let Err(e) = fs::remove_dir_all(&self.root).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to clean up {}: {}", self.root.display(), e);
            }
        }
    }
}
