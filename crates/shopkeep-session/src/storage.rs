//! # Snapshot Storage
//!
//! The two key-value slots a session snapshot can live in.
//!
//! ## Two-Slot Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Snapshot Storage Slots                                │
//! │                                                                         │
//! │  DURABLE (remember me = true)       EPHEMERAL (remember me = false)    │
//! │  ─────────────────────────────      ────────────────────────────────   │
//! │  • Survives app restart             • Survives within one process      │
//! │  • FileStore on disk                • MemoryStore slot                 │
//! │  • Platform config dir via          • Dropped when the process exits   │
//! │    directories::ProjectDirs                                             │
//! │                                                                         │
//! │  INVARIANT: at most ONE slot holds a snapshot at a time. The session   │
//! │  store writes to one and clears the other on every persist.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each slot holds a single serialized blob under a fixed location; there
//! is no keyspace. Both implementations are injectable so tests can swap
//! in scratch directories or plain memory.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::StorageError;

/// A single-slot store for one serialized session snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Reads the snapshot, if one is present. A missing snapshot is
    /// `Ok(None)`, not an error.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Writes the snapshot, replacing any previous one.
    fn store(&self, snapshot: &str) -> Result<(), StorageError>;

    /// Removes the snapshot. Clearing an empty slot is a no-op.
    fn clear(&self) -> Result<(), StorageError>;
}

// =============================================================================
// File Store (durable)
// =============================================================================

/// Snapshot slot backed by a single file on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a file store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    /// Default durable location under the platform config directory,
    /// e.g. `~/.config/shopkeep/session.json` on Linux.
    pub fn default_durable() -> Option<Self> {
        directories::ProjectDirs::from("com", "shopkeep", "client")
            .map(|dirs| FileStore::new(dirs.config_dir().join("session.json")))
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, snapshot: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, snapshot)?;
        debug!(path = ?self.path, "session snapshot written");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Memory Store (ephemeral)
// =============================================================================

/// Snapshot slot held in process memory.
///
/// This is the ephemeral backend: it survives UI reloads within one
/// process but nothing beyond it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        let slot = self.slot.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(slot.clone())
    }

    fn store(&self, snapshot: &str) -> Result<(), StorageError> {
        let mut slot = self.slot.lock().map_err(|_| StorageError::Poisoned)?;
        *slot = Some(snapshot.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut slot = self.slot.lock().map_err(|_| StorageError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.store("{\"token\":\"t1\"}").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("{\"token\":\"t1\"}"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_memory_store_clear_empty_is_noop() {
        let store = MemoryStore::new();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_file_store_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("session.json"));

        store.store("snapshot-body").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("snapshot-body"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_file_store_clear_missing_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));

        store.store("first").unwrap();
        store.store("second").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("second"));
    }
}
