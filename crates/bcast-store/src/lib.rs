//! Archive extraction and asset listing.
//!
//! This crate provides:
//! - The `AssetArchive` collaborator trait ("extract archive to directory")
//! - An `unzip`-backed default implementation
//! - Extension-filtered directory listing with stable ordering

pub mod archive;
pub mod error;
pub mod listing;

pub use archive::{AssetArchive, UnzipExtractor};
pub use error::{StoreError, StoreResult};
pub use listing::list_by_extension;
