//! Shared data models for the Beatcast pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Raw assets and batch sessions
//! - Beat metadata extracted from audio filenames
//! - Assembly jobs and publish events
//! - Release cadence and the publish schedule
//!
//! Everything here is pure data plus pure functions; no I/O.

pub mod asset;
pub mod beat;
pub mod cadence;
pub mod job;
pub mod schedule;

// Re-export common types
pub use asset::{AssetKind, RawAsset, SessionId};
pub use beat::{parse_beat_filename, BeatMetadata};
pub use cadence::Cadence;
pub use job::{AssemblyJob, JobStatus, PublishEvent, UploadTemplate};
pub use schedule::publish_schedule;
