//! Error types shared by the store, registry and router.

use crate::capability::Namespace;
use crate::capability::ValidationError;
use thiserror::Error;

/// Failures of the durable medium backing the user collection.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be read or written
    #[error("Storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    /// The backing file exists but does not hold a valid collection
    #[error("Corrupt collection: {0}")]
    Corrupt(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),
}

/// Errors surfaced by the capability layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No capability registered under this name (or URI) in the namespace
    #[error("{namespace} not found: {name}")]
    NotFound { namespace: Namespace, name: String },

    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Two capabilities registered under one name; fatal at startup
    #[error("Duplicate {namespace} registration: '{name}'")]
    DuplicateName { namespace: Namespace, name: String },

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A handler ran and failed for a reason other than storage
    #[error("Handler failed: {0}")]
    HandlerFailed(String),
}

impl ApiError {
    pub fn not_found(namespace: Namespace, name: impl Into<String>) -> Self {
        ApiError::NotFound {
            namespace,
            name: name.into(),
        }
    }
}
