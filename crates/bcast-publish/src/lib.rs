//! Publish-target collaborator interfaces.
//!
//! This crate provides:
//! - The `PublishTarget` trait: authenticate + chunked-resumable publish
//! - The `CredentialStore` trait with a JSON-file implementation
//! - A dry-run publisher for local runs and tests
//!
//! The actual publishing protocol (OAuth dance, resumable upload endpoints)
//! lives behind these traits and is out of scope here.

pub mod credentials;
pub mod error;
pub mod target;

pub use credentials::{CredentialStore, Credentials, FileCredentialStore};
pub use error::{PublishError, PublishResult};
pub use target::{
    CredentialHandle, DryRunPublisher, PublishReceipt, PublishRequest, PublishTarget,
    UploadProgress,
};
