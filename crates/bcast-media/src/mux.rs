//! Still-image + audio muxing.

use std::path::Path;
use tokio::sync::watch;
use tracing::debug;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::probe::get_audio_duration;
use crate::progress::FfmpegProgress;

/// Combine a (normalized) still image with a full audio track into a video.
///
/// The image is looped for the whole duration and the output is trimmed to
/// the audio length (`-shortest`). Progress percentages are computed against
/// the probed audio duration.
pub async fn mux_still(
    image: impl AsRef<Path>,
    audio: impl AsRef<Path>,
    output: impl AsRef<Path>,
    cancel_rx: Option<watch::Receiver<bool>>,
    timeout_secs: Option<u64>,
) -> MediaResult<()> {
    let audio = audio.as_ref();
    let output = output.as_ref();

    let duration_ms = (get_audio_duration(audio).await? * 1000.0) as i64;

    let cmd = FfmpegCommand::new(output)
        .looped_still(image.as_ref())
        .input(audio)
        .video_codec("libx264")
        .audio_codec("aac")
        .audio_bitrate("192k")
        .shortest()
        .pixel_format("yuv420p");

    let mut runner = FfmpegRunner::new();
    if let Some(rx) = cancel_rx {
        runner = runner.with_cancel(rx);
    }
    if let Some(secs) = timeout_secs {
        runner = runner.with_timeout(secs);
    }

    let output_display = output.display().to_string();
    runner
        .run_with_progress(&cmd, move |progress: FfmpegProgress| {
            debug!(
                "Muxing {}: {:.1}%",
                output_display,
                progress.percentage(duration_ms)
            );
        })
        .await
}
