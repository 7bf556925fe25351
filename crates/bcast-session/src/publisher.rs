//! Batch publication against a publish target.
//!
//! Resolves listing data per job (template verbatim, otherwise derived
//! from the parsed beat metadata), walks the rendered queue in pairing
//! order and retries transient upload failures per item.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use bcast_models::{AssemblyJob, PublishEvent, UploadTemplate};
use bcast_publish::{PublishError, PublishReceipt, PublishRequest, PublishTarget, UploadProgress};

use crate::error::SessionResult;
use crate::retry::{retry_async, RetryConfig, RetryResult};

/// Default tags applied when no template overrides them.
const DEFAULT_TAGS: [&str; 3] = ["beat", "hiphop", "rap"];

/// Default description applied when no template overrides it.
const DEFAULT_DESCRIPTION: &str = "Subscribe and listen for more beats!";

/// Resolve the listing data for one job: template fields verbatim when a
/// template is set, otherwise title/description/tags derived from the
/// job's parsed metadata.
pub fn resolve_publication(
    job: &AssemblyJob,
    template: Option<&UploadTemplate>,
) -> (String, String, Vec<String>) {
    if let Some(t) = template {
        return (t.title.clone(), t.description.clone(), t.tags.clone());
    }

    let meta = &job.metadata;

    let title = if meta.title.is_empty() {
        audio_stem(&job.audio.original_name)
    } else {
        let mut parts = vec![meta.title.clone()];
        if let Some(bpm) = &meta.bpm {
            parts.push(format!("{bpm}BPM"));
        }
        if let Some(key) = &meta.key {
            parts.push(key.clone());
        }
        parts.join(" ")
    };

    let description = if meta.authors.is_empty() {
        DEFAULT_DESCRIPTION.to_string()
    } else {
        format!("{DEFAULT_DESCRIPTION}\nProd. by {}", meta.authors.join(", "))
    };

    let mut tags: Vec<String> = DEFAULT_TAGS.iter().map(|t| t.to_string()).collect();
    tags.extend(
        meta.authors
            .iter()
            .map(|a| a.trim_start_matches('@').to_string()),
    );

    (title, description, tags)
}

fn audio_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
        .to_string()
}

/// Outcome of draining the publish queue.
#[derive(Debug, Default)]
pub struct PublishReport {
    /// Successful uploads: pairing index plus target receipt
    pub receipts: Vec<(usize, PublishReceipt)>,
    /// Upload failures that survived the retries: index plus reason
    pub failures: Vec<(usize, String)>,
    /// Jobs skipped because they never rendered
    pub skipped: Vec<usize>,
    /// Resolved publish events, one per attempted upload
    pub events: Vec<PublishEvent>,
    /// True when the run stopped early on the cancellation flag
    pub cancelled: bool,
}

impl PublishReport {
    /// True when every rendered job was published.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }
}

/// Drains a rendered batch into a [`PublishTarget`].
pub struct BatchPublisher {
    target: Arc<dyn PublishTarget>,
    retry: RetryConfig,
}

impl BatchPublisher {
    pub fn new(target: Arc<dyn PublishTarget>) -> Self {
        Self {
            target,
            retry: RetryConfig::new("publish"),
        }
    }

    /// Override the per-item retry policy.
    pub fn with_retry(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.retry = RetryConfig::new("publish")
            .with_max_retries(max_retries)
            .with_base_delay(base_delay);
        self
    }

    /// Publish every rendered job against its schedule slot.
    ///
    /// Slot `i` of `schedule` belongs to job `i` whether or not the job
    /// rendered, so a failed pair leaves a gap instead of shifting later
    /// releases. Authentication failure aborts before any upload; a
    /// per-item failure is recorded and the queue keeps draining.
    pub async fn publish_batch(
        &self,
        jobs: &[AssemblyJob],
        template: Option<&UploadTemplate>,
        schedule: &[DateTime<Utc>],
        cancel_rx: watch::Receiver<bool>,
        progress: &(dyn Fn(usize, UploadProgress) + Send + Sync),
    ) -> SessionResult<PublishReport> {
        let handle = self.target.authenticate().await?;

        let mut report = PublishReport::default();

        for (i, (job, scheduled_at)) in jobs.iter().zip(schedule).enumerate() {
            if *cancel_rx.borrow() {
                report.cancelled = true;
                break;
            }

            if !job.is_rendered() {
                report.skipped.push(i);
                continue;
            }
            let artifact = match &job.artifact_path {
                Some(p) => p.clone(),
                None => {
                    report.skipped.push(i);
                    continue;
                }
            };

            let (title, description, tags) = resolve_publication(job, template);
            report.events.push(PublishEvent {
                job_index: i,
                scheduled_at: *scheduled_at,
                title: title.clone(),
                description: description.clone(),
                tags: tags.clone(),
            });

            let request = PublishRequest {
                video_path: artifact,
                title,
                description,
                tags,
                publish_at: *scheduled_at,
            };

            let outcome = retry_async(&self.retry, PublishError::is_retryable, || {
                let request = request.clone();
                let handle = handle.clone();
                async move {
                    self.target
                        .publish(&handle, &request, &|p| progress(i, p))
                        .await
                }
            })
            .await;

            match outcome {
                RetryResult::Success(receipt) => {
                    info!(
                        "Published '{}' as {} for {}",
                        request.title, receipt.remote_id, receipt.scheduled_at
                    );
                    report.receipts.push((i, receipt));
                }
                RetryResult::Failed { error, attempts } => {
                    warn!(
                        "Publish of '{}' failed after {} attempts: {}",
                        request.title, attempts, error
                    );
                    report.failures.push((i, error.to_string()));
                }
            }
        }

        Ok(report)
    }
}
