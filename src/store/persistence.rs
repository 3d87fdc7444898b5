//! JSON file backed user store.

use super::{next_id, Insertion, UserStore};
use crate::concurrency::CollectionLocks;
use crate::error::StorageError;
use crate::types::{names_match, NewUser, UserRecord};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Store backed by one pretty-printed JSON array on disk
///
/// A missing file reads as an empty collection. A file that exists but cannot be read or
/// parsed is an error.
pub struct JsonFileStore {
    path: PathBuf,
    locks: Arc<CollectionLocks>,
}

impl JsonFileStore {
    /// Open a store with its own lock table
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_locks(path, Arc::new(CollectionLocks::new()))
    }

    /// Open a store sharing `locks` with other handles
    pub fn with_locks(path: impl Into<PathBuf>, locks: Arc<CollectionLocks>) -> Self {
        Self {
            path: path.into(),
            locks,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` over the loaded collection and rewrite it, holding the file lock throughout
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Vec<UserRecord>) -> Result<(T, bool), StorageError>,
    ) -> Result<T, StorageError> {
        let lock = self.locks.lock_for(&self.path);
        let _guard = lock.lock();

        let mut users = self.read_collection()?;
        let (value, changed) = f(&mut users)?;
        if changed {
            self.write_collection(&users)?;
        }
        Ok(value)
    }

    fn check_path(&self) -> Result<(), StorageError> {
        if self.path.file_name().is_none() {
            return Err(StorageError::InvalidPath(format!(
                "{} does not name a file",
                self.path.display()
            )));
        }
        Ok(())
    }

    fn read_collection(&self) -> Result<Vec<UserRecord>, StorageError> {
        self.check_path()?;
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Collection file absent, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::Unavailable(e)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            StorageError::Corrupt(format!("{}: {}", self.path.display(), e))
        })
    }

    /// Full-file replace: write a sibling temp file, then rename over the target
    fn write_collection(&self, users: &[UserRecord]) -> Result<(), StorageError> {
        self.check_path()?;
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let json = serde_json::to_string_pretty(users)
            .map_err(|e| StorageError::Corrupt(format!("Failed to serialize collection: {}", e)))?;

        let mut temp = tempfile::NamedTempFile::new_in(&parent)?;
        temp.write_all(json.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| StorageError::Unavailable(e.error))?;

        debug!(path = %self.path.display(), records = users.len(), "Collection rewritten");
        Ok(())
    }
}

impl UserStore for JsonFileStore {
    fn load_all(&self) -> Result<Vec<UserRecord>, StorageError> {
        self.read_collection()
    }

    fn append(&self, candidate: NewUser) -> Result<UserRecord, StorageError> {
        let record = self.mutate(|users| {
            let record = candidate.with_id(next_id(users)?);
            users.push(record.clone());
            Ok((record, true))
        })?;
        info!(user_id = record.id, "User appended");
        Ok(record)
    }

    fn append_unless_named(&self, candidate: NewUser) -> Result<Insertion, StorageError> {
        let insertion = self.mutate(|users| {
            if let Some(existing) = users.iter().find(|u| names_match(&u.name, &candidate.name)) {
                return Ok((Insertion::Existing(existing.clone()), false));
            }
            let record = candidate.with_id(next_id(users)?);
            users.push(record.clone());
            Ok((Insertion::Created(record), true))
        })?;
        if let Insertion::Created(record) = &insertion {
            info!(user_id = record.id, "User appended");
        }
        Ok(insertion)
    }

    fn persist(&self, users: &[UserRecord]) -> Result<(), StorageError> {
        let lock = self.locks.lock_for(&self.path);
        let _guard = lock.lock();
        self.write_collection(users)
    }
}
