//! Per-session batch state machine.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use bcast_models::{AssemblyJob, Cadence, RawAsset, SessionId, UploadTemplate};

use crate::error::{SessionError, SessionResult};

/// Lifecycle stage of a batch session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Accepting audio, image, archive and template uploads
    CollectingAssets,
    /// Assembly pipeline is running in a background task
    Processing,
    /// Batch rendered, waiting for a cadence choice
    ScheduleSelection,
    /// Upload queue is being drained
    Publishing,
    /// All work done, session is closed
    Completed,
    /// Abandoned by the user
    Cancelled,
}

impl SessionState {
    /// Terminal states accept no further intents.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Cancelled)
    }
}

/// All state for one batch release session.
///
/// Owned by the registry behind a mutex; the assembly pipeline runs on a
/// snapshot taken at `begin_processing` and merges results back through
/// `complete_processing`, so the lock is never held across a render.
#[derive(Debug)]
pub struct BatchSession {
    id: SessionId,
    state: SessionState,
    audio: Vec<RawAsset>,
    images: Vec<RawAsset>,
    template: Option<UploadTemplate>,
    jobs: Vec<AssemblyJob>,
    cadence: Option<Cadence>,
    cancel_tx: watch::Sender<bool>,
}

impl BatchSession {
    pub fn new(id: SessionId) -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            id,
            state: SessionState::CollectingAssets,
            audio: Vec::new(),
            images: Vec::new(),
            template: None,
            jobs: Vec::new(),
            cadence: None,
            cancel_tx,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn jobs(&self) -> &[AssemblyJob] {
        &self.jobs
    }

    pub fn template(&self) -> Option<&UploadTemplate> {
        self.template.as_ref()
    }

    pub fn cadence(&self) -> Option<Cadence> {
        self.cadence
    }

    pub fn audio_count(&self) -> usize {
        self.audio.len()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Subscribe to the cooperative cancellation flag.
    pub fn cancel_rx(&self) -> watch::Receiver<bool> {
        self.cancel_tx.subscribe()
    }

    /// Record an uploaded audio asset. Returns the new audio count.
    pub fn collect_audio(&mut self, asset: RawAsset) -> SessionResult<usize> {
        self.require_state("audio upload", SessionState::CollectingAssets)?;
        self.audio.push(asset);
        Ok(self.audio.len())
    }

    /// Record an uploaded image asset. Returns the new image count.
    pub fn collect_image(&mut self, asset: RawAsset) -> SessionResult<usize> {
        self.require_state("image upload", SessionState::CollectingAssets)?;
        self.images.push(asset);
        Ok(self.images.len())
    }

    /// Apply a template to every item in the batch.
    pub fn set_template(&mut self, template: UploadTemplate) -> SessionResult<()> {
        self.require_state("set template", SessionState::CollectingAssets)?;
        self.template = Some(template);
        Ok(())
    }

    /// Drop any previously set template.
    pub fn clear_template(&mut self) -> SessionResult<()> {
        self.require_state("clear template", SessionState::CollectingAssets)?;
        self.template = None;
        Ok(())
    }

    /// Validate the collected assets and enter `Processing`.
    ///
    /// Returns snapshots of the asset lists plus a cancellation receiver
    /// for the pipeline task.
    pub fn begin_processing(
        &mut self,
    ) -> SessionResult<(Vec<RawAsset>, Vec<RawAsset>, watch::Receiver<bool>)> {
        self.require_state("process", SessionState::CollectingAssets)?;
        if self.audio.is_empty() && self.images.is_empty() {
            return Err(SessionError::NoAssets);
        }
        if self.audio.len() != self.images.len() {
            return Err(SessionError::CountMismatch {
                audio: self.audio.len(),
                images: self.images.len(),
            });
        }
        self.state = SessionState::Processing;
        Ok((self.audio.clone(), self.images.clone(), self.cancel_tx.subscribe()))
    }

    /// Merge rendered jobs back and move to `ScheduleSelection`.
    pub fn complete_processing(&mut self, jobs: Vec<AssemblyJob>) -> SessionResult<()> {
        self.require_state("finish processing", SessionState::Processing)?;
        self.jobs = jobs;
        self.state = SessionState::ScheduleSelection;
        Ok(())
    }

    /// Record the chosen cadence and enter `Publishing`.
    pub fn select_cadence(&mut self, cadence: Cadence) -> SessionResult<()> {
        self.require_state("select cadence", SessionState::ScheduleSelection)?;
        self.cadence = Some(cadence);
        self.state = SessionState::Publishing;
        Ok(())
    }

    /// Return to `ScheduleSelection` with the rendered queue intact.
    ///
    /// Used when the publish target refuses authentication; the user can
    /// pick a cadence again after fixing credentials.
    pub fn abort_publishing(&mut self) -> SessionResult<()> {
        self.require_state("abort publishing", SessionState::Publishing)?;
        self.cadence = None;
        self.state = SessionState::ScheduleSelection;
        Ok(())
    }

    /// Mark the batch fully published.
    pub fn complete_publishing(&mut self) -> SessionResult<()> {
        self.require_state("finish publishing", SessionState::Publishing)?;
        self.state = SessionState::Completed;
        Ok(())
    }

    /// Cancel the session from any non-terminal state and raise the
    /// cooperative cancellation flag for in-flight work.
    pub fn cancel(&mut self) -> SessionResult<SessionState> {
        if self.state.is_terminal() {
            return Err(SessionError::invalid_state("cancel", self.state));
        }
        let previous = self.state;
        self.state = SessionState::Cancelled;
        let _ = self.cancel_tx.send(true);
        Ok(previous)
    }

    fn require_state(&self, action: &'static str, expected: SessionState) -> SessionResult<()> {
        if self.state != expected {
            return Err(SessionError::invalid_state(action, self.state));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn audio(name: &str) -> RawAsset {
        RawAsset::audio(PathBuf::from(format!("/tmp/{name}")), name.to_string())
    }

    fn image(name: &str) -> RawAsset {
        RawAsset::image(PathBuf::from(format!("/tmp/{name}")), name.to_string())
    }

    fn session() -> BatchSession {
        BatchSession::new(SessionId::from_string("chat-1"))
    }

    #[test]
    fn test_collect_counts() {
        let mut s = session();
        assert_eq!(s.collect_audio(audio("a.mp3")).unwrap(), 1);
        assert_eq!(s.collect_audio(audio("b.mp3")).unwrap(), 2);
        assert_eq!(s.collect_image(image("c.jpg")).unwrap(), 1);
    }

    #[test]
    fn test_process_requires_assets() {
        let mut s = session();
        assert!(matches!(s.begin_processing(), Err(SessionError::NoAssets)));
        assert_eq!(s.state(), SessionState::CollectingAssets);
    }

    #[test]
    fn test_process_requires_equal_counts() {
        let mut s = session();
        s.collect_audio(audio("a.mp3")).unwrap();
        s.collect_image(image("x.jpg")).unwrap();
        s.collect_image(image("y.jpg")).unwrap();

        match s.begin_processing() {
            Err(SessionError::CountMismatch { audio, images }) => {
                assert_eq!(audio, 1);
                assert_eq!(images, 2);
            }
            other => panic!("expected CountMismatch, got {other:?}"),
        }
        assert_eq!(s.state(), SessionState::CollectingAssets);
    }

    #[test]
    fn test_full_lifecycle() {
        let mut s = session();
        s.collect_audio(audio("a.mp3")).unwrap();
        s.collect_image(image("x.jpg")).unwrap();

        let (audio_snap, image_snap, _rx) = s.begin_processing().unwrap();
        assert_eq!(audio_snap.len(), 1);
        assert_eq!(image_snap.len(), 1);
        assert_eq!(s.state(), SessionState::Processing);

        s.complete_processing(Vec::new()).unwrap();
        assert_eq!(s.state(), SessionState::ScheduleSelection);

        s.select_cadence(Cadence::Daily).unwrap();
        assert_eq!(s.state(), SessionState::Publishing);

        s.complete_publishing().unwrap();
        assert_eq!(s.state(), SessionState::Completed);
    }

    #[test]
    fn test_abort_publishing_preserves_jobs() {
        let mut s = session();
        s.collect_audio(audio("a.mp3")).unwrap();
        s.collect_image(image("x.jpg")).unwrap();
        s.begin_processing().unwrap();

        let meta = bcast_models::parse_beat_filename("a.mp3");
        let job = AssemblyJob::new(audio("a.mp3"), image("x.jpg"), meta);
        s.complete_processing(vec![job]).unwrap();
        s.select_cadence(Cadence::Weekly).unwrap();

        s.abort_publishing().unwrap();
        assert_eq!(s.state(), SessionState::ScheduleSelection);
        assert_eq!(s.jobs().len(), 1);
        assert_eq!(s.cadence(), None);
    }

    #[test]
    fn test_cancel_raises_flag() {
        let mut s = session();
        let rx = s.cancel_rx();
        assert!(!*rx.borrow());

        s.cancel().unwrap();
        assert_eq!(s.state(), SessionState::Cancelled);
        assert!(*rx.borrow());
    }

    #[test]
    fn test_cancel_twice_is_rejected() {
        let mut s = session();
        s.cancel().unwrap();
        assert!(matches!(
            s.cancel(),
            Err(SessionError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_uploads_rejected_after_processing() {
        let mut s = session();
        s.collect_audio(audio("a.mp3")).unwrap();
        s.collect_image(image("x.jpg")).unwrap();
        s.begin_processing().unwrap();

        assert!(matches!(
            s.collect_audio(audio("b.mp3")),
            Err(SessionError::InvalidState { .. })
        ));
    }
}
