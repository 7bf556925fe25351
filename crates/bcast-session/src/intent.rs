//! Typed intents and replies exchanged with the interactive front-end.
//!
//! The front-end (chat bot, console, test harness) translates its own
//! protocol into these types; the core never formats a network protocol.

use std::path::PathBuf;

use bcast_models::{Cadence, UploadTemplate};

/// A named command from the front-end's command surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// `/process`: pair assets and run the assembly pipeline
    Process,
    /// Cadence selection (`/daily`, `/every_other_day`, `/weekly`)
    Cadence(Cadence),
    /// `/cancel`: abandon the session
    Cancel,
}

impl SessionCommand {
    /// Parse a slash command. Returns `None` for unrecognized input.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text.to_lowercase().as_str() {
            "/process" => Some(SessionCommand::Process),
            "/cancel" => Some(SessionCommand::Cancel),
            _ => Cadence::from_command(text).map(SessionCommand::Cadence),
        }
    }
}

/// A discrete event delivered by the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIntent {
    /// Session opened (e.g. `/start`)
    Start,
    /// Free text that is not a recognized upload or command
    Text(String),
    /// Apply a template to every item in the batch
    SetTemplate(UploadTemplate),
    /// Drop the template and fall back to per-track metadata
    ClearTemplate,
    /// An uploaded audio file, already persisted by the front-end
    AudioUpload {
        path: PathBuf,
        original_name: String,
    },
    /// An uploaded image file
    ImageUpload {
        path: PathBuf,
        original_name: String,
    },
    /// An uploaded archive holding audio and/or images
    ArchiveUpload { path: PathBuf },
    /// A named command
    Command(SessionCommand),
}

/// Reply text plus optional keyboard options for the front-end to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReply {
    /// Message shown to the user
    pub text: String,
    /// Keyboard options, one label per button
    pub options: Vec<String>,
}

impl SessionReply {
    /// Plain text reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
        }
    }

    /// Reply with keyboard options.
    pub fn with_options<I, S>(text: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}
