//! User Record Store
//!
//! Owns the durable user collection. Every operation reads the collection fresh from the
//! backing medium; mutations rewrite the full snapshot before returning.

pub mod persistence;

use crate::error::StorageError;
use crate::types::{names_match, NewUser, UserId, UserRecord};

pub use persistence::JsonFileStore;

/// Outcome of a conditional append
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// A record with the same name was already present; nothing was written
    Existing(UserRecord),
    Created(UserRecord),
}

/// User collection interface
pub trait UserStore: Send + Sync {
    /// Read the whole collection in insertion order
    fn load_all(&self) -> Result<Vec<UserRecord>, StorageError>;

    /// Assign the next id to `candidate`, append it and rewrite the collection
    fn append(&self, candidate: NewUser) -> Result<UserRecord, StorageError>;

    /// Append `candidate` unless a record with a matching name exists. The lookup and the
    /// append happen in one critical section.
    fn append_unless_named(&self, candidate: NewUser) -> Result<Insertion, StorageError>;

    /// Replace the durable collection with `users`
    fn persist(&self, users: &[UserRecord]) -> Result<(), StorageError>;

    fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.load_all()?.into_iter().find(|u| u.id == id))
    }

    /// First record, in insertion order, whose name matches ignoring case and padding
    fn find_by_name(&self, name: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self
            .load_all()?
            .into_iter()
            .find(|u| names_match(&u.name, name)))
    }
}

/// Next id for a collection: one past the largest id present
pub fn next_id(users: &[UserRecord]) -> Result<UserId, StorageError> {
    let max = users.iter().map(|u| u.id).max().unwrap_or(0);
    max.checked_add(1)
        .ok_or_else(|| StorageError::Corrupt(format!("id space exhausted after {}", max)))
}
