//! High-level JSON-RPC surface over any [`RpcTransport`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::block::{Block, BlockSpec};
use crate::call::CallOpts;
use crate::error::{RpcFailed, TransportError};
use crate::transport::RpcTransport;
use crate::types::{Address, Data, Hash, Int};

/// A ledger client bound to one transport for its whole lifetime.
///
/// Apart from the request-id counter the client holds no state: nothing is
/// cached and failed calls are not retried. It is `Send + Sync` and can be
/// shared behind an `Arc`.
pub struct Client {
    transport: Arc<dyn RpcTransport>,
    next_id: AtomicU64,
}

impl Client {
    pub fn new(transport: impl RpcTransport) -> Self {
        Self::from_arc(Arc::new(transport))
    }

    pub fn from_arc(transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn transport(&self) -> &Arc<dyn RpcTransport> {
        &self.transport
    }

    /// Send `method` with raw params and return the raw result.
    pub async fn raw(&self, method: &'static str, params: Vec<Value>) -> Result<Value, RpcFailed> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(id, method, url = %self.transport.url(), "dispatching request");
        self.transport
            .request(id, method, params)
            .await
            .map_err(|e| RpcFailed::new(method, e))
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Vec<Value>,
    ) -> Result<T, RpcFailed> {
        let result = self.raw(method, params).await?;
        serde_json::from_value(result).map_err(|e| RpcFailed::new(method, e.into()))
    }

    /// Submit a state-changing call; returns the transaction hash.
    pub async fn send_call(&self, opts: &CallOpts) -> Result<Hash, RpcFailed> {
        const METHOD: &str = "eth_sendTransaction";
        self.call(METHOD, vec![param(METHOD, opts)?]).await
    }

    /// Estimate the gas `opts` would use, against the pending block.
    pub async fn estimate_gas(&self, opts: &CallOpts) -> Result<Int, RpcFailed> {
        const METHOD: &str = "eth_estimateGas";
        self.call(METHOD, vec![param(METHOD, opts)?, param(METHOD, BlockSpec::Pending)?])
            .await
    }

    /// Execute `opts` without mining it, in the pending block if `pending`
    /// is set and the latest block otherwise.
    ///
    /// `T` is whatever the raw result should be read as; usually [`Data`],
    /// which the caller then decodes.
    pub async fn const_call<T: DeserializeOwned>(
        &self,
        opts: &CallOpts,
        pending: bool,
    ) -> Result<T, RpcFailed> {
        const METHOD: &str = "eth_call";
        let block = if pending { BlockSpec::Pending } else { BlockSpec::Latest };
        self.call(METHOD, vec![param(METHOD, opts)?, param(METHOD, block)?])
            .await
    }

    /// Read the 32-byte storage word at `slot` of contract `addr`.
    pub async fn storage_at(
        &self,
        addr: &Address,
        slot: &Hash,
        block: BlockSpec,
    ) -> Result<Hash, RpcFailed> {
        const METHOD: &str = "eth_getStorageAt";
        self.call(
            METHOD,
            vec![param(METHOD, addr)?, param(METHOD, slot)?, param(METHOD, block)?],
        )
        .await
    }

    /// Fetch a block, with full transaction objects if `include_txs`.
    /// A block that does not exist is an error.
    pub async fn get_block(&self, block: BlockSpec, include_txs: bool) -> Result<Block, RpcFailed> {
        const METHOD: &str = "eth_getBlockByNumber";
        let block: Option<Block> = self
            .call(METHOD, vec![param(METHOD, block)?, Value::Bool(include_txs)])
            .await?;
        block.ok_or_else(|| {
            RpcFailed::new(METHOD, TransportError::Other("node returned null".into()))
        })
    }

    /// Contract code deployed at `addr` in the latest block.
    pub async fn get_code(&self, addr: &Address) -> Result<Data, RpcFailed> {
        const METHOD: &str = "eth_getCode";
        self.call(METHOD, vec![param(METHOD, addr)?, param(METHOD, BlockSpec::Latest)?])
            .await
    }

    pub async fn block_number(&self) -> Result<Int, RpcFailed> {
        self.call("eth_blockNumber", vec![]).await
    }

    /// The node's current gas price, passed through as-is.
    pub async fn gas_price(&self) -> Result<Int, RpcFailed> {
        self.call("eth_gasPrice", vec![]).await
    }

    pub async fn balance_at(&self, addr: &Address, block: BlockSpec) -> Result<Int, RpcFailed> {
        const METHOD: &str = "eth_getBalance";
        self.call(METHOD, vec![param(METHOD, addr)?, param(METHOD, block)?])
            .await
    }
}

fn param(method: &'static str, value: impl Serialize) -> Result<Value, RpcFailed> {
    serde_json::to_value(value).map_err(|e| RpcFailed::new(method, e.into()))
}
