//! Error types for encoding, transport and the client surface.

use thiserror::Error;

use crate::request::JsonRpcError;

/// Errors raised while typechecking or encoding a contract call.
///
/// These are programmer errors: the signature or argument list is wrong and
/// retrying the same call will fail the same way. No bytes are ever returned
/// alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    #[error("malformed signature {signature:?}: {reason}")]
    MalformedSignature { signature: String, reason: String },

    #[error("mismatched argument lists: {declared} declared vs {given} given")]
    ArityMismatch { declared: usize, given: usize },

    #[error("argument {position}: declared {declared}, got {got}")]
    TypeMismatch {
        position: usize,
        declared: String,
        got: &'static str,
    },

    #[error("{kind} of {len} bytes does not fit in a 32-byte word")]
    EncodingOverflow { kind: &'static str, len: usize },
}

/// Errors that can occur during a transport round trip.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, non-2xx status, bad body).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Local socket connect/read/write error, or the connection is gone.
    #[error("IPC error: {0}")]
    Ipc(String),

    /// JSON-RPC protocol-level error returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Response could not be deserialized into the expected type.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns `true` if the node executed the request and rejected it.
    pub fn is_execution_error(&self) -> bool {
        matches!(self, Self::Rpc(_))
    }
}

/// Text could not be parsed into one of the primitive types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("expected {expected} bytes, got {got}")]
    Length { expected: usize, got: usize },

    #[error("invalid integer {0:?}")]
    Integer(String),
}

/// A block specifier token could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockSpecError {
    #[error("bad block specifier {token:?}: {reason}")]
    Malformed { token: String, reason: String },
}

/// The single failure condition of the [`Client`](crate::client::Client)
/// surface: the named RPC method did not produce a usable result.
#[derive(Debug, Error)]
#[error("RPC {method} failed: {source}")]
pub struct RpcFailed {
    pub method: &'static str,
    #[source]
    pub source: TransportError,
}

impl RpcFailed {
    pub(crate) fn new(method: &'static str, source: TransportError) -> Self {
        Self { method, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_failed_keeps_cause() {
        let err = RpcFailed::new("eth_call", TransportError::Http("HTTP 502: bad gateway".into()));
        assert_eq!(err.to_string(), "RPC eth_call failed: HTTP error: HTTP 502: bad gateway");
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("502"));
    }

    #[test]
    fn only_rpc_errors_are_execution_errors() {
        let rpc = TransportError::Rpc(JsonRpcError {
            code: 3,
            message: "execution reverted".into(),
            data: None,
        });
        assert!(rpc.is_execution_error());
        assert!(!TransportError::Ipc("closed".into()).is_execution_error());
    }
}
