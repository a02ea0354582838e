//! The `RpcTransport` trait every wire substrate plugs into.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

/// The central async trait every RPC transport must implement.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; a single transport is shared by
/// every caller of a [`Client`](crate::client::Client).
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Perform one request/response round trip.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// Return the transport's identifier (URL or socket path).
    fn url(&self) -> &str;

    /// Wrap `method` and `params` in a JSON-RPC envelope, send it, and
    /// return the raw result payload. A JSON-RPC error object is reported as
    /// [`TransportError::Rpc`].
    async fn request(
        &self,
        id: u64,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, TransportError> {
        let req = JsonRpcRequest::new(id, method, params);
        self.send(req).await?.into_result()
    }
}
