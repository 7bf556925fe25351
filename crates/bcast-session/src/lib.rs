//! Batch session orchestration.
//!
//! This crate provides:
//! - Typed intents and replies for the interactive front-end
//! - The batch session state machine
//! - The explicit session registry (create/lookup/destroy)
//! - Asset pairing with randomized image assignment
//! - The offloaded assembly pipeline with per-job failure isolation
//! - Sequential publishing with per-item retry and failure reporting

pub mod config;
pub mod error;
pub mod intent;
pub mod logging;
pub mod pairer;
pub mod pipeline;
pub mod publisher;
pub mod registry;
pub mod retry;
pub mod service;
pub mod session;

pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use intent::{SessionCommand, SessionIntent, SessionReply};
pub use logging::SessionLogger;
pub use pairer::{pair_assets, AssetPair};
pub use pipeline::{AssemblyPipeline, PipelineReport};
pub use publisher::{resolve_publication, BatchPublisher, PublishReport};
pub use registry::{SessionEntry, SessionRegistry};
pub use retry::{retry_async, RetryConfig, RetryResult};
pub use service::SessionService;
pub use session::{BatchSession, SessionState};
