//! Persisted session storage
//!
//! The only state that survives a process restart: the bearer token and the
//! serialized user, written together as one JSON file and cleared together.
//! Writes go through a temporary file and a rename so a reader never observes
//! a half-written session.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{StorageError, StorageResult};
use crate::models::User;

/// Durable session record: token and user, persisted as a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    /// Opaque bearer token
    pub token: String,
    /// Serialized identity
    pub user: User,
}

/// File-backed store for the persisted session
///
/// The storage root is injectable so tests can point it at a tempdir.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    dir: PathBuf,
}

impl SessionStorage {
    /// Storage rooted at the platform data dir (`.../tasklink`)
    #[must_use]
    pub fn new() -> Self {
        let dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tasklink");
        Self { dir }
    }

    /// Storage rooted at an explicit directory
    #[must_use]
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_path(&self) -> PathBuf {
        self.dir.join("session.json")
    }

    /// Persist token and user atomically
    pub fn save(&self, session: &PersistedSession) -> StorageResult<()> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.file_path();
        let json = serde_json::to_string_pretty(session)?;

        // Write to temporary file first, then rename (atomic operation)
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, json).map_err(|e| StorageError::WriteFailed {
            path: temp_path.clone(),
            reason: e.to_string(),
        })?;
        std::fs::rename(&temp_path, &path)?;

        tracing::debug!("Session persisted to {:?}", path);
        Ok(())
    }

    /// Load the persisted session
    ///
    /// Returns `Ok(None)` when nothing is persisted and
    /// `Err(StorageError::Corrupted)` when the file exists but cannot be
    /// parsed.
    pub fn load(&self) -> StorageResult<Option<PersistedSession>> {
        let path = self.file_path();
        if !path.exists() {
            return Ok(None);
        }

        let json = std::fs::read_to_string(&path).map_err(|e| StorageError::ReadFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        match serde_json::from_str(&json) {
            Ok(session) => Ok(Some(session)),
            Err(_) => Err(StorageError::Corrupted),
        }
    }

    /// Load, discarding a corrupted session instead of failing
    ///
    /// This is the hydration path: malformed persisted data is purged and the
    /// caller starts anonymous.
    pub fn load_or_purge(&self) -> Option<PersistedSession> {
        match self.load() {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!("Discarding unreadable persisted session: {err}");
                if let Err(purge_err) = self.purge() {
                    tracing::warn!("Failed to purge corrupted session: {purge_err}");
                }
                None
            }
        }
    }

    /// Remove the persisted session; missing file is not an error
    pub fn purge(&self) -> StorageResult<()> {
        let path = self.file_path();
        if path.exists() {
            std::fs::remove_file(&path)?;
            tracing::debug!("Persisted session cleared");
        }
        Ok(())
    }

    /// Current bearer token, if a readable session is persisted
    ///
    /// Read fresh on every call so a purge by another component (401
    /// handling) is honored immediately.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.load().ok().flatten().map(|s| s.token)
    }
}

impl Default for SessionStorage {
    fn default() -> Self {
        Self::new()
    }
}
