//! Mutation safety for the persisted collection
//!
//! Every store-mutating operation loads, mutates and rewrites the whole file. Two such
//! sequences interleaving would lose one write, so each backing file gets one mutex that
//! is held across the full load+mutate+rewrite sequence.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Per-file lock table
///
/// Store handles that share a `CollectionLocks` and point at the same path serialize
/// their mutations against each other. Handles on different files never block.
pub struct CollectionLocks {
    /// Map from backing file path to its mutation lock
    locks: RwLock<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl CollectionLocks {
    pub fn new() -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Get or create the lock for a backing file
    pub fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let key = normalize(path);
        {
            let map = self.locks.read();
            if let Some(lock) = map.get(&key) {
                return lock.clone();
            }
        }

        let mut map = self.locks.write();
        // Another thread may have inserted between the read and write guards
        map.entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl Default for CollectionLocks {
    fn default() -> Self {
        Self::new()
    }
}

/// Absolute, lexically cleaned form of `path`, so `./a.json`, `a.json` and `d/../a.json`
/// share a lock. The key never depends on which directories exist yet.
fn normalize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut key = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                if !matches!(key.components().next_back(), Some(Component::RootDir) | None) {
                    key.pop();
                }
            }
            other => key.push(other.as_os_str()),
        }
    }
    key
}
