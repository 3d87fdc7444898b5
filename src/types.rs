//! Core record types for the user collection.

use serde::{Deserialize, Serialize};

/// UserId: positive integer, unique within the collection
pub type UserId = u64;

/// A persisted user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
}

/// Caller-supplied fields for a record that has no id yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
}

impl NewUser {
    /// Attach an id, producing the record that will be stored
    pub fn with_id(self, id: UserId) -> UserRecord {
        UserRecord {
            id,
            name: self.name,
            email: self.email,
            address: self.address,
            phone: self.phone,
        }
    }
}

/// Name comparison used for lookups: trimmed and case-insensitive
pub fn names_match(stored: &str, query: &str) -> bool {
    stored.trim().to_lowercase() == query.trim().to_lowercase()
}
