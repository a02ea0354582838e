//! chaincall-ipc — local socket JSON-RPC transport.
//!
//! # Features
//! - Explicit socket path or platform-default discovery
//! - Request multiplexing over a single connection
//! - Out-of-order responses matched by id

#[cfg(unix)]
pub mod client;
pub mod discovery;

#[cfg(unix)]
pub use client::IpcRpcClient;
pub use discovery::default_paths;
