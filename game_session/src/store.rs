//! Opaque blob storage for sessions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Identifier of one player's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Somewhere to keep serialized worlds between requests.
///
/// The engine never looks inside a blob beyond deserializing it.
pub trait BlobStore {
    fn load(&self, id: SessionId) -> Option<String>;

    fn save(&mut self, id: SessionId, blob: String);

    fn remove(&mut self, id: SessionId) -> Option<String>;
}

/// In-process store, one blob per session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<SessionId, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl BlobStore for MemoryStore {
    fn load(&self, id: SessionId) -> Option<String> {
        self.blobs.get(&id).cloned()
    }

    fn save(&mut self, id: SessionId, blob: String) {
        self.blobs.insert(id, blob);
    }

    fn remove(&mut self, id: SessionId) -> Option<String> {
        self.blobs.remove(&id)
    }
}
