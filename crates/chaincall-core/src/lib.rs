//! chaincall-core — contract-call encoding and the transport-agnostic client.
//!
//! # Overview
//!
//! The core crate defines:
//!
//! - [`types`] — `Address`, `Int`, `Data`, `Hash` and their ABI words
//! - [`abi`] — signature typechecking and the Contract ABI encoder
//! - [`CallOpts`] — the call/transaction descriptor
//! - [`RpcTransport`] — the async trait every transport implements
//! - [`Client`] — the JSON-RPC surface (`eth_call`, `eth_getStorageAt`, ...)
//! - [`BlockSpec`] — block number / `latest` / `pending` resolution
//!
//! Concrete transports live in `chaincall-http`, `chaincall-ipc` and
//! `chaincall-providers`.

pub mod abi;
pub mod block;
pub mod call;
pub mod client;
pub mod error;
pub mod request;
pub mod transport;
pub mod types;

pub use abi::AbiValue;
pub use block::{Block, BlockSpec, BlockTransaction, Transaction};
pub use call::CallOpts;
pub use client::Client;
pub use error::{AbiError, BlockSpecError, ParseError, RpcFailed, TransportError};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use transport::RpcTransport;
pub use types::{Address, Data, Hash, Int};
