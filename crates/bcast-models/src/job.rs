//! Assembly jobs and publish events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::asset::RawAsset;
use crate::beat::BeatMetadata;

/// Lifecycle of a single audio+image assembly job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Waiting for the assembly pipeline
    #[default]
    Pending,
    /// Artifact rendered successfully
    Rendered,
    /// Assembly failed; `error` carries the reason
    Failed,
}

/// One audio+image pair with its derived metadata and rendered artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyJob {
    /// Audio asset (drives duration and metadata)
    pub audio: RawAsset,

    /// Image asset assigned by the pairer
    pub image: RawAsset,

    /// Metadata parsed from the audio asset's original filename
    pub metadata: BeatMetadata,

    /// Rendered video path, set on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_path: Option<PathBuf>,

    /// Job status
    #[serde(default)]
    pub status: JobStatus,

    /// Failure reason, set when `status == Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AssemblyJob {
    /// Create a pending job for a pair.
    pub fn new(audio: RawAsset, image: RawAsset, metadata: BeatMetadata) -> Self {
        Self {
            audio,
            image,
            metadata,
            artifact_path: None,
            status: JobStatus::Pending,
            error: None,
        }
    }

    /// Mark the job rendered with its artifact path.
    pub fn rendered(mut self, artifact_path: impl Into<PathBuf>) -> Self {
        self.artifact_path = Some(artifact_path.into());
        self.status = JobStatus::Rendered;
        self.error = None;
        self
    }

    /// Mark the job failed with a reason.
    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
        self
    }

    /// True when an artifact is ready to publish.
    pub fn is_rendered(&self) -> bool {
        self.status == JobStatus::Rendered && self.artifact_path.is_some()
    }
}

/// User-supplied template applied to every item in the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTemplate {
    /// Title for every video
    pub title: String,
    /// Description for every video
    pub description: String,
    /// Tags for every video
    pub tags: Vec<String>,
}

impl UploadTemplate {
    /// Parse a comma-separated tag list, dropping empty entries.
    pub fn parse_tags(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// One scheduled publication, derived from a rendered job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishEvent {
    /// Index of the job in the batch's pairing order
    pub job_index: usize,

    /// When the item goes live (UTC)
    pub scheduled_at: DateTime<Utc>,

    /// Resolved title
    pub title: String,

    /// Resolved description
    pub description: String,

    /// Resolved tags
    pub tags: Vec<String>,
}
