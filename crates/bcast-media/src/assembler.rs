//! The media-assembly collaborator trait and its FFmpeg-backed default.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::info;

use crate::error::{MediaError, MediaResult};
use crate::letterbox::{letterbox_image, OutputFrame};
use crate::mux::mux_still;

/// External image/video assembly collaborator.
///
/// Both operations are treated as potentially slow; callers decide about
/// offloading and per-item failure isolation.
#[async_trait]
pub trait MediaAssembler: Send + Sync {
    /// Normalize an image onto the canonical frame.
    async fn normalize(&self, input_image: &Path, output_image: &Path) -> MediaResult<()>;

    /// Mux a normalized still image with a full audio track.
    async fn mux(&self, image: &Path, audio: &Path, output_video: &Path) -> MediaResult<()>;
}

/// Default assembler: `image`-crate letterboxing plus the ffmpeg CLI.
#[derive(Debug, Clone)]
pub struct FfmpegAssembler {
    frame: OutputFrame,
    mux_timeout_secs: Option<u64>,
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl FfmpegAssembler {
    /// Create an assembler targeting the given frame.
    pub fn new(frame: OutputFrame) -> Self {
        Self {
            frame,
            mux_timeout_secs: None,
            cancel_rx: None,
        }
    }

    /// Bound each mux invocation to `secs` seconds.
    pub fn with_mux_timeout(mut self, secs: u64) -> Self {
        self.mux_timeout_secs = Some(secs);
        self
    }

    /// Observe a cancellation flag; checked when a mux finishes.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }
}

impl Default for FfmpegAssembler {
    fn default() -> Self {
        Self::new(OutputFrame::default())
    }
}

#[async_trait]
impl MediaAssembler for FfmpegAssembler {
    async fn normalize(&self, input_image: &Path, output_image: &Path) -> MediaResult<()> {
        let input = input_image.to_path_buf();
        let output: PathBuf = output_image.to_path_buf();
        let frame = self.frame;

        info!("Normalizing {} onto {:?} frame", input.display(), frame);

        // Pixel work is CPU-bound; keep it off the async threads.
        tokio::task::spawn_blocking(move || letterbox_image(&input, &output, frame))
            .await
            .map_err(|e| MediaError::internal(format!("letterbox task panicked: {e}")))?
    }

    async fn mux(&self, image: &Path, audio: &Path, output_video: &Path) -> MediaResult<()> {
        info!(
            "Muxing {} + {} -> {}",
            image.display(),
            audio.display(),
            output_video.display()
        );
        mux_still(
            image,
            audio,
            output_video,
            self.cancel_rx.clone(),
            self.mux_timeout_secs,
        )
        .await
    }
}
