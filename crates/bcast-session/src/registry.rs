//! In-memory session registry.
//!
//! Every active chat maps to exactly one entry. The registry hands out
//! `Arc`-wrapped sessions so callers lock a single session without
//! holding the registry map.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;

use bcast_media::SessionWorkdir;
use bcast_models::SessionId;

use crate::session::BatchSession;

/// A live session plus its working directory.
#[derive(Clone)]
pub struct SessionEntry {
    pub session: Arc<AsyncMutex<BatchSession>>,
    pub workdir: SessionWorkdir,
}

/// Registry of active sessions keyed by session id.
#[derive(Default)]
pub struct SessionRegistry {
    entries: Mutex<HashMap<SessionId, SessionEntry>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new entry, replacing any previous one for the same id.
    pub fn insert(&self, id: SessionId, workdir: SessionWorkdir) -> SessionEntry {
        let entry = SessionEntry {
            session: Arc::new(AsyncMutex::new(BatchSession::new(id.clone()))),
            workdir,
        };
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(id, entry.clone());
        entry
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &SessionId) -> Option<SessionEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(id).cloned()
    }

    /// Remove an entry, returning it so the caller can clean up.
    pub fn remove(&self, id: &SessionId) -> Option<SessionEntry> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(id)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
