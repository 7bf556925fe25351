//! Raw assets and session identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Unique identifier for a batch session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string (e.g. a chat ID from the front-end).
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of an ingested asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Audio track (the beat itself)
    Audio,
    /// Cover image
    Image,
}

/// A single ingested asset, owned by its session until consumed by pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAsset {
    /// Path to the downloaded file inside the session working area
    pub path: PathBuf,

    /// Asset kind
    pub kind: AssetKind,

    /// Original filename as uploaded by the user (metadata source)
    pub original_name: String,
}

impl RawAsset {
    /// Create an audio asset.
    pub fn audio(path: impl Into<PathBuf>, original_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: AssetKind::Audio,
            original_name: original_name.into(),
        }
    }

    /// Create an image asset.
    pub fn image(path: impl Into<PathBuf>, original_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: AssetKind::Image,
            original_name: original_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_roundtrip() {
        let id = SessionId::from_string("chat-42");
        assert_eq!(id.as_str(), "chat-42");
        assert_eq!(id.to_string(), "chat-42");
    }

    #[test]
    fn test_raw_asset_constructors() {
        let audio = RawAsset::audio("/tmp/a.mp3", "Jay 140BPM - Nightfall.mp3");
        assert_eq!(audio.kind, AssetKind::Audio);
        assert_eq!(audio.original_name, "Jay 140BPM - Nightfall.mp3");

        let image = RawAsset::image("/tmp/c.jpg", "cover.jpg");
        assert_eq!(image.kind, AssetKind::Image);
    }
}
