//! Transport Adapter
//!
//! Line-delimited JSON-RPC 2.0 over a byte stream. No handshake is performed; each line
//! is one request and each reply is one line.

pub mod jsonrpc;
pub mod stdio;

pub use jsonrpc::{handle_line, JsonRpcId, JsonRpcRequest, JsonRpcResponse};
pub use stdio::{run_stdio, serve};
