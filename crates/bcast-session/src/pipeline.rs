//! Sequential assembly pipeline.
//!
//! Renders one artifact per audio/image pair: parse metadata from the
//! audio filename (an embedded ID3 title outranks the filename-derived
//! one), normalize the image onto the canonical frame, then mux the
//! still with the full track. A failed pair is recorded and skipped;
//! the rest of the batch still renders.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use bcast_media::{read_title_tag, MediaAssembler, SessionWorkdir};
use bcast_models::{parse_beat_filename, AssemblyJob};

use crate::pairer::AssetPair;

/// Outcome of one pipeline run, index-aligned with the pairing order.
#[derive(Debug)]
pub struct PipelineReport {
    /// One job per input pair
    pub jobs: Vec<AssemblyJob>,
    /// True when the run stopped early on the cancellation flag
    pub cancelled: bool,
}

impl PipelineReport {
    /// Number of successfully rendered jobs.
    pub fn rendered_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.is_rendered()).count()
    }

    /// Failed jobs with their pairing index and reason.
    pub fn failures(&self) -> Vec<(usize, &str)> {
        self.jobs
            .iter()
            .enumerate()
            .filter_map(|(i, j)| j.error.as_deref().map(|e| (i, e)))
            .collect()
    }
}

/// Drives the media assembler over a batch of pairs.
pub struct AssemblyPipeline {
    assembler: Arc<dyn MediaAssembler>,
}

impl AssemblyPipeline {
    pub fn new(assembler: Arc<dyn MediaAssembler>) -> Self {
        Self { assembler }
    }

    /// Assemble every pair in order.
    ///
    /// The cancellation flag is checked between pairs; a raised flag marks
    /// the remaining jobs pending and returns immediately.
    pub async fn assemble(
        &self,
        pairs: Vec<AssetPair>,
        workdir: &SessionWorkdir,
        cancel_rx: watch::Receiver<bool>,
    ) -> PipelineReport {
        let mut jobs = Vec::with_capacity(pairs.len());
        let mut cancelled = false;

        for (i, (audio, image)) in pairs.into_iter().enumerate() {
            let metadata = parse_beat_filename(&audio.original_name);
            let job = AssemblyJob::new(audio, image, metadata);

            if cancelled || *cancel_rx.borrow() {
                // Remaining pairs stay pending so the report still covers
                // the whole batch.
                cancelled = true;
                jobs.push(job);
                continue;
            }

            jobs.push(self.assemble_one(job, i + 1, workdir).await);
        }

        PipelineReport { jobs, cancelled }
    }

    async fn assemble_one(
        &self,
        mut job: AssemblyJob,
        index: usize,
        workdir: &SessionWorkdir,
    ) -> AssemblyJob {
        if let Some(tag_title) = read_title_tag(&job.audio.path) {
            job.metadata.title = tag_title;
        }

        let normalized = workdir.normalized_image_path(index);
        if let Err(e) = self.assembler.normalize(&job.image.path, &normalized).await {
            warn!(
                "Normalize failed for {}: {}",
                job.image.original_name, e
            );
            return job.failed(format!("image normalization failed: {e}"));
        }

        let artifact = workdir.artifact_path(index);
        match self
            .assembler
            .mux(&normalized, &job.audio.path, &artifact)
            .await
        {
            Ok(()) => job.rendered(artifact),
            Err(e) => {
                warn!("Mux failed for {}: {}", job.audio.original_name, e);
                job.failed(format!("mux failed: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bcast_media::{MediaError, MediaResult};
    use bcast_models::{JobStatus, RawAsset, SessionId};
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct StubAssembler {
        fail_mux_for: Option<&'static str>,
        normalize_calls: AtomicUsize,
        mux_calls: AtomicUsize,
    }

    impl StubAssembler {
        fn new() -> Self {
            Self {
                fail_mux_for: None,
                normalize_calls: AtomicUsize::new(0),
                mux_calls: AtomicUsize::new(0),
            }
        }

        fn failing_mux_for(audio_name: &'static str) -> Self {
            Self {
                fail_mux_for: Some(audio_name),
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl MediaAssembler for StubAssembler {
        async fn normalize(&self, _input: &Path, output: &Path) -> MediaResult<()> {
            self.normalize_calls.fetch_add(1, Ordering::SeqCst);
            tokio::fs::write(output, b"img").await?;
            Ok(())
        }

        async fn mux(&self, _image: &Path, audio: &Path, output: &Path) -> MediaResult<()> {
            self.mux_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(name) = self.fail_mux_for {
                if audio.to_string_lossy().contains(name) {
                    return Err(MediaError::invalid_audio(format!(
                        "unreadable audio: {}",
                        audio.display()
                    )));
                }
            }
            tokio::fs::write(output, b"video").await?;
            Ok(())
        }
    }

    async fn workdir() -> (TempDir, SessionWorkdir) {
        let base = TempDir::new().unwrap();
        let wd = SessionWorkdir::create(base.path(), &SessionId::from_string("chat-1"))
            .await
            .unwrap();
        (base, wd)
    }

    fn pair(audio_name: &str, image_name: &str) -> AssetPair {
        (
            RawAsset::audio(format!("/tmp/{audio_name}"), audio_name),
            RawAsset::image(format!("/tmp/{image_name}"), image_name),
        )
    }

    fn idle_cancel() -> watch::Receiver<bool> {
        let (tx, rx) = watch::channel(false);
        std::mem::forget(tx);
        rx
    }

    #[tokio::test]
    async fn test_all_pairs_render() {
        let (_base, wd) = workdir().await;
        let assembler = Arc::new(StubAssembler::new());
        let pipeline = AssemblyPipeline::new(assembler.clone());

        let pairs = vec![
            pair("Jay 140BPM Cmin - Nightfall.mp3", "a.jpg"),
            pair("Mia 90 - Dawn.mp3", "b.jpg"),
        ];
        let report = pipeline.assemble(pairs, &wd, idle_cancel()).await;

        assert!(!report.cancelled);
        assert_eq!(report.rendered_count(), 2);
        assert_eq!(assembler.normalize_calls.load(Ordering::SeqCst), 2);
        assert_eq!(assembler.mux_calls.load(Ordering::SeqCst), 2);

        assert_eq!(report.jobs[0].metadata.title, "Nightfall");
        assert_eq!(report.jobs[0].metadata.bpm.as_deref(), Some("140"));
        assert_eq!(
            report.jobs[0].artifact_path.as_deref(),
            Some(wd.artifact_path(1).as_path())
        );
        assert_eq!(report.jobs[1].metadata.title, "Dawn");
    }

    #[tokio::test]
    async fn test_embedded_title_tag_outranks_filename() {
        use id3::TagLike;

        let (_base, wd) = workdir().await;
        let uploads = TempDir::new().unwrap();
        let audio_path = uploads.path().join("beat.mp3");
        std::fs::write(&audio_path, b"").unwrap();
        let mut tag = id3::Tag::new();
        tag.set_title("Studio Master");
        tag.write_to_path(&audio_path, id3::Version::Id3v24).unwrap();

        let pairs = vec![(
            RawAsset::audio(audio_path, "Jay 140BPM - Nightfall.mp3"),
            RawAsset::image("/tmp/a.jpg", "a.jpg"),
        )];
        let pipeline = AssemblyPipeline::new(Arc::new(StubAssembler::new()));
        let report = pipeline.assemble(pairs, &wd, idle_cancel()).await;

        // The tag replaces only the title; the rest still comes from the
        // filename grammar.
        assert_eq!(report.jobs[0].metadata.title, "Studio Master");
        assert_eq!(report.jobs[0].metadata.bpm.as_deref(), Some("140"));
        assert_eq!(report.jobs[0].metadata.authors, vec!["Jay"]);
    }

    #[tokio::test]
    async fn test_failed_pair_is_isolated() {
        let (_base, wd) = workdir().await;
        let assembler = Arc::new(StubAssembler::failing_mux_for("Broken"));
        let pipeline = AssemblyPipeline::new(assembler);

        let pairs = vec![
            pair("Broken - One.mp3", "a.jpg"),
            pair("Fine - Two.mp3", "b.jpg"),
        ];
        let report = pipeline.assemble(pairs, &wd, idle_cancel()).await;

        assert!(!report.cancelled);
        assert_eq!(report.rendered_count(), 1);
        assert_eq!(report.jobs[0].status, JobStatus::Failed);
        assert!(report.jobs[1].is_rendered());

        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, 0);
    }

    #[tokio::test]
    async fn test_raised_flag_stops_before_first_pair() {
        let (_base, wd) = workdir().await;
        let assembler = Arc::new(StubAssembler::new());
        let pipeline = AssemblyPipeline::new(assembler.clone());

        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let pairs = vec![pair("A - One.mp3", "a.jpg"), pair("B - Two.mp3", "b.jpg")];
        let report = pipeline.assemble(pairs, &wd, rx).await;

        assert!(report.cancelled);
        assert_eq!(report.jobs.len(), 2);
        assert_eq!(report.rendered_count(), 0);
        assert_eq!(assembler.mux_calls.load(Ordering::SeqCst), 0);
        assert!(report.jobs.iter().all(|j| j.status == JobStatus::Pending));
    }
}
