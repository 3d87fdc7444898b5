//! Roster: capability server over a persisted user collection
//!
//! Exposes named actions, resources and prompts to a line-delimited JSON-RPC transport.
//! Every capability reads the collection fresh from disk; mutations rewrite the full
//! snapshot under a per-file lock.

pub mod builtin;
pub mod capability;
pub mod concurrency;
pub mod config;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod router;
pub mod server;
pub mod store;
pub mod transport;
pub mod types;
