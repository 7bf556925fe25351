//! Session service: routes front-end intents through the state machine,
//! the assembly pipeline and the batch publisher.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info};

use bcast_media::{MediaAssembler, SessionWorkdir};
use bcast_models::{publish_schedule, Cadence, RawAsset, SessionId};
use bcast_publish::PublishTarget;
use bcast_store::{list_by_extension, AssetArchive};

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::intent::{SessionCommand, SessionIntent, SessionReply};
use crate::logging::SessionLogger;
use crate::pairer::pair_assets;
use crate::pipeline::AssemblyPipeline;
use crate::publisher::BatchPublisher;
use crate::registry::{SessionEntry, SessionRegistry};
use crate::session::SessionState;

const AUDIO_EXTENSIONS: [&str; 1] = ["mp3"];
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Orchestrates batch sessions over pluggable media, archive and publish
/// collaborators.
pub struct SessionService {
    config: SessionConfig,
    registry: SessionRegistry,
    assembler: Arc<dyn MediaAssembler>,
    archive: Arc<dyn AssetArchive>,
    target: Arc<dyn PublishTarget>,
}

impl SessionService {
    pub fn new(
        config: SessionConfig,
        assembler: Arc<dyn MediaAssembler>,
        archive: Arc<dyn AssetArchive>,
        target: Arc<dyn PublishTarget>,
    ) -> Self {
        Self {
            config,
            registry: SessionRegistry::new(),
            assembler,
            archive,
            target,
        }
    }

    /// Handle one front-end intent for a session, creating the session on
    /// first contact. User mistakes come back as explanatory replies with
    /// the session state unchanged; operational failures are logged and
    /// reported generically.
    pub async fn handle(&self, session_id: &SessionId, intent: SessionIntent) -> Vec<SessionReply> {
        match self.dispatch(session_id, intent).await {
            Ok(replies) => replies,
            Err(e) if e.is_user_error() => vec![SessionReply::text(e.to_string())],
            Err(e) => {
                error!(session_id = %session_id, "Intent failed: {e}");
                vec![SessionReply::text(
                    "Something went wrong on our side. Please try again.",
                )]
            }
        }
    }

    /// Current state of a session, if it exists. Intended for tests and
    /// diagnostics.
    pub async fn session_state(&self, session_id: &SessionId) -> Option<SessionState> {
        let entry = self.registry.get(session_id)?;
        let state = entry.session.lock().await.state();
        Some(state)
    }

    async fn dispatch(
        &self,
        session_id: &SessionId,
        intent: SessionIntent,
    ) -> SessionResult<Vec<SessionReply>> {
        let entry = self.ensure_entry(session_id).await?;

        match intent {
            SessionIntent::Start => Ok(vec![SessionReply::text(
                "Send me your beats (.mp3) and covers (.jpg/.png), one per track, \
                 or a .zip with both. Optionally set a shared template, then /process.",
            )]),
            SessionIntent::Text(text) => match SessionCommand::parse(&text) {
                Some(command) => self.handle_command(session_id, &entry, command).await,
                None => Ok(vec![SessionReply::text(
                    "I did not understand that. Upload assets or use /process, \
                     /cancel, /daily, /every_other_day, /weekly.",
                )]),
            },
            SessionIntent::Command(command) => {
                self.handle_command(session_id, &entry, command).await
            }
            SessionIntent::SetTemplate(template) => {
                entry.session.lock().await.set_template(template)?;
                Ok(vec![SessionReply::text(
                    "Template saved. It will be applied to every video in this batch.",
                )])
            }
            SessionIntent::ClearTemplate => {
                entry.session.lock().await.clear_template()?;
                Ok(vec![SessionReply::text(
                    "Template cleared. Titles will come from the audio filenames.",
                )])
            }
            SessionIntent::AudioUpload {
                path,
                original_name,
            } => self.ingest_audio(&entry, &path, &original_name).await,
            SessionIntent::ImageUpload {
                path,
                original_name,
            } => self.ingest_image(&entry, &path, &original_name).await,
            SessionIntent::ArchiveUpload { path } => self.ingest_archive(&entry, &path).await,
        }
    }

    async fn handle_command(
        &self,
        session_id: &SessionId,
        entry: &SessionEntry,
        command: SessionCommand,
    ) -> SessionResult<Vec<SessionReply>> {
        match command {
            SessionCommand::Process => self.run_processing(session_id, entry).await,
            SessionCommand::Cadence(cadence) => {
                self.run_publishing(session_id, entry, cadence).await
            }
            SessionCommand::Cancel => self.cancel_session(session_id, entry).await,
        }
    }

    async fn ensure_entry(&self, session_id: &SessionId) -> SessionResult<SessionEntry> {
        if let Some(entry) = self.registry.get(session_id) {
            return Ok(entry);
        }
        let workdir = SessionWorkdir::create(&self.config.work_dir, session_id).await?;
        info!(session_id = %session_id, "Session created");
        Ok(self.registry.insert(session_id.clone(), workdir))
    }

    async fn ingest_audio(
        &self,
        entry: &SessionEntry,
        path: &Path,
        original_name: &str,
    ) -> SessionResult<Vec<SessionReply>> {
        if !has_extension(original_name, &AUDIO_EXTENSIONS) {
            return Err(SessionError::UnsupportedFile(original_name.to_string()));
        }
        let dest = entry.workdir.audio_dir().join(sanitize_name(original_name));
        tokio::fs::copy(path, &dest).await?;

        let asset = RawAsset::audio(dest, original_name);
        let count = entry.session.lock().await.collect_audio(asset)?;
        Ok(vec![SessionReply::text(format!(
            "Audio received ({count} total)."
        ))])
    }

    async fn ingest_image(
        &self,
        entry: &SessionEntry,
        path: &Path,
        original_name: &str,
    ) -> SessionResult<Vec<SessionReply>> {
        if !has_extension(original_name, &IMAGE_EXTENSIONS) {
            return Err(SessionError::UnsupportedFile(original_name.to_string()));
        }
        let dest = entry.workdir.image_dir().join(sanitize_name(original_name));
        tokio::fs::copy(path, &dest).await?;

        let asset = RawAsset::image(dest, original_name);
        let count = entry.session.lock().await.collect_image(asset)?;
        Ok(vec![SessionReply::text(format!(
            "Image received ({count} total)."
        ))])
    }

    async fn ingest_archive(
        &self,
        entry: &SessionEntry,
        path: &Path,
    ) -> SessionResult<Vec<SessionReply>> {
        let extract_dir = entry.workdir.root().join("extracted");
        self.archive.extract(path, &extract_dir).await?;

        let audio_paths = list_by_extension(&extract_dir, &AUDIO_EXTENSIONS).await?;
        let image_paths = list_by_extension(&extract_dir, &IMAGE_EXTENSIONS).await?;

        let mut session = entry.session.lock().await;
        let mut audio_added = 0;
        for p in &audio_paths {
            let name = file_name(p);
            session.collect_audio(RawAsset::audio(p.clone(), name))?;
            audio_added += 1;
        }
        let mut images_added = 0;
        for p in &image_paths {
            let name = file_name(p);
            session.collect_image(RawAsset::image(p.clone(), name))?;
            images_added += 1;
        }

        Ok(vec![SessionReply::text(format!(
            "Archive unpacked: {audio_added} audio files and {images_added} images added \
             ({} audio / {} images total).",
            session.audio_count(),
            session.image_count()
        ))])
    }

    async fn run_processing(
        &self,
        session_id: &SessionId,
        entry: &SessionEntry,
    ) -> SessionResult<Vec<SessionReply>> {
        let logger = SessionLogger::new(session_id, "assembly");

        let (audio, images, cancel_rx) = entry.session.lock().await.begin_processing()?;
        let total = audio.len();
        logger.log_start(&format!("{total} pairs"));

        let pairs = pair_assets(audio, images, &mut rand::rng());
        let pipeline = AssemblyPipeline::new(self.assembler.clone());
        let workdir = entry.workdir.clone();

        // Rendering is slow; run it as its own task so the session lock
        // stays free for /cancel.
        let report = tokio::spawn(async move { pipeline.assemble(pairs, &workdir, cancel_rx).await })
            .await
            .map_err(|e| SessionError::internal(format!("assembly task failed: {e}")))?;

        let mut session = entry.session.lock().await;
        if session.state() == SessionState::Cancelled || report.cancelled {
            drop(session);
            logger.log_warning("cancelled mid-batch");
            self.destroy(session_id).await;
            return Ok(vec![SessionReply::text("Batch cancelled.")]);
        }

        let rendered = report.rendered_count();
        let failures = report
            .failures()
            .iter()
            .map(|(i, e)| format!("  #{}: {e}", i + 1))
            .collect::<Vec<_>>();
        session.complete_processing(report.jobs)?;
        drop(session);

        logger.log_completion(&format!("{rendered}/{total} rendered"));

        let mut text = format!("Rendered {rendered} of {total} videos.");
        if !failures.is_empty() {
            text.push_str("\nFailed:\n");
            text.push_str(&failures.join("\n"));
        }
        text.push_str("\nPick a release cadence:");

        Ok(vec![SessionReply::with_options(
            text,
            Cadence::all().iter().map(|c| c.as_command()),
        )])
    }

    async fn run_publishing(
        &self,
        session_id: &SessionId,
        entry: &SessionEntry,
        cadence: Cadence,
    ) -> SessionResult<Vec<SessionReply>> {
        let logger = SessionLogger::new(session_id, "publishing");

        let (jobs, template, cancel_rx) = {
            let mut session = entry.session.lock().await;
            session.select_cadence(cadence)?;
            (
                session.jobs().to_vec(),
                session.template().cloned(),
                session.cancel_rx(),
            )
        };

        let schedule = publish_schedule(Utc::now(), jobs.len(), cadence);
        logger.log_start(&format!("{} jobs, {cadence} cadence", jobs.len()));

        let publisher = BatchPublisher::new(self.target.clone()).with_retry(
            self.config.max_publish_retries,
            Duration::from_millis(self.config.publish_retry_base_ms),
        );

        let result = publisher
            .publish_batch(&jobs, template.as_ref(), &schedule, cancel_rx, &|i, p| {
                debug!("Upload {}: {:.0}%", i + 1, p.percentage());
            })
            .await;

        let report = match result {
            Ok(report) => report,
            Err(SessionError::Publish(e)) => {
                logger.log_error(&format!("authentication failed: {e}"));
                entry.session.lock().await.abort_publishing()?;
                return Ok(vec![SessionReply::with_options(
                    "Could not sign in to the publish target. Fix the credentials \
                     and pick a cadence again.",
                    Cadence::all().iter().map(|c| c.as_command()),
                )]);
            }
            Err(e) => return Err(e),
        };

        {
            let mut session = entry.session.lock().await;
            if session.state() == SessionState::Cancelled || report.cancelled {
                drop(session);
                logger.log_warning("cancelled mid-queue");
                self.destroy(session_id).await;
                return Ok(vec![SessionReply::text("Batch cancelled.")]);
            }
            session.complete_publishing()?;
        }

        logger.log_completion(&format!(
            "{} published, {} failed, {} skipped",
            report.receipts.len(),
            report.failures.len(),
            report.skipped.len()
        ));

        let mut lines = vec![format!(
            "Scheduled {} of {} videos:",
            report.receipts.len(),
            jobs.len()
        )];
        for event in &report.events {
            lines.push(format!(
                "  {} at {}",
                event.title,
                event.scheduled_at.format("%Y-%m-%d %H:%M UTC")
            ));
        }
        for (i, reason) in &report.failures {
            lines.push(format!("  #{} failed: {reason}", i + 1));
        }
        for i in &report.skipped {
            lines.push(format!("  #{} skipped (never rendered)", i + 1));
        }
        lines.push("All done. See you next batch!".to_string());

        self.destroy(session_id).await;
        Ok(vec![SessionReply::text(lines.join("\n"))])
    }

    async fn cancel_session(
        &self,
        session_id: &SessionId,
        entry: &SessionEntry,
    ) -> SessionResult<Vec<SessionReply>> {
        let previous = entry.session.lock().await.cancel()?;
        info!(session_id = %session_id, "Session cancelled from {previous:?}");

        // Mid-pipeline cancellation leaves teardown to the task that owns
        // the run; it observes the flag and destroys the session itself.
        if previous != SessionState::Processing && previous != SessionState::Publishing {
            self.destroy(session_id).await;
        }
        Ok(vec![SessionReply::text("Batch cancelled.")])
    }

    async fn destroy(&self, session_id: &SessionId) {
        if let Some(entry) = self.registry.remove(session_id) {
            entry.workdir.cleanup().await;
        }
    }
}

fn has_extension(name: &str, allowed: &[&str]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_lowercase();
            allowed.iter().any(|want| *want == e)
        })
        .unwrap_or(false)
}

/// Map anything outside `[A-Za-z0-9_.-]` to `_` for on-disk names; the
/// original name survives on the asset for metadata extraction.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(
            sanitize_name("Jay 140BPM Cmin - Nightfall.mp3"),
            "Jay_140BPM_Cmin_-_Nightfall.mp3"
        );
        assert_eq!(sanitize_name("café/..\\x.jpg"), "caf__.._x.jpg");
    }

    #[test]
    fn test_extension_check() {
        assert!(has_extension("a.MP3", &AUDIO_EXTENSIONS));
        assert!(has_extension("cover.JPeG", &IMAGE_EXTENSIONS));
        assert!(!has_extension("notes.txt", &AUDIO_EXTENSIONS));
        assert!(!has_extension("noext", &AUDIO_EXTENSIONS));
    }
}
