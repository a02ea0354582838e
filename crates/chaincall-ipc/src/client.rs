//! Unix-socket JSON-RPC client.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::sync::{mpsc, oneshot};

use chaincall_core::error::TransportError;
use chaincall_core::request::{JsonRpcRequest, JsonRpcResponse, RpcId};
use chaincall_core::transport::RpcTransport;

use crate::discovery::default_paths;

type Responder = oneshot::Sender<Result<JsonRpcResponse, TransportError>>;

/// In-flight requests keyed by the id written on the socket, holding the
/// caller's own id so it can be restored on the response.
type PendingMap = HashMap<u64, (RpcId, Responder)>;

/// Command sent from callers to the background IPC task.
enum IpcCommand {
    Send { req: JsonRpcRequest, tx: Responder },
    Close,
}

/// JSON-RPC over a local socket.
///
/// A background task owns the connection. Callers hand it requests through a
/// channel; the task rewrites each request id to a connection-unique one so
/// any number of callers (and clients sharing this transport) can be in
/// flight at once. Responses are matched back by id, in whatever order the
/// node sends them.
///
/// There is no reconnect: once the node closes the socket every pending and
/// future request fails with [`TransportError::Ipc`].
pub struct IpcRpcClient {
    path: String,
    cmd_tx: mpsc::UnboundedSender<IpcCommand>,
}

impl IpcRpcClient {
    /// Connect to the socket at `path` and start the background task.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let path = path.as_ref();
        let stream = UnixStream::connect(path)
            .await
            .map_err(|e| TransportError::Ipc(format!("connect {}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), "connected via IPC");

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<IpcCommand>();
        tokio::spawn(ipc_task(stream, cmd_rx));

        Ok(Self {
            path: path.display().to_string(),
            cmd_tx,
        })
    }

    /// Connect to the first platform-default socket that accepts a
    /// connection (see [`default_paths`]).
    pub async fn dial() -> Result<Self, TransportError> {
        let candidates = default_paths();
        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::connect(path).await {
                Ok(client) => return Ok(client),
                Err(e) => tracing::debug!(error = %e, "IPC candidate rejected"),
            }
        }
        let tried: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
        Err(TransportError::Ipc(format!(
            "no local IPC endpoint found (tried: {})",
            tried.join(", ")
        )))
    }
}

impl Drop for IpcRpcClient {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(IpcCommand::Close);
    }
}

#[async_trait]
impl RpcTransport for IpcRpcClient {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(IpcCommand::Send { req, tx })
            .map_err(|_| TransportError::Ipc("IPC connection closed".into()))?;
        rx.await
            .map_err(|_| TransportError::Ipc("IPC response dropped".into()))?
    }

    fn url(&self) -> &str {
        &self.path
    }
}

/// Background task that owns the socket.
async fn ipc_task(stream: UnixStream, mut cmd_rx: mpsc::UnboundedReceiver<IpcCommand>) {
    let (mut reader, mut writer) = stream.into_split();
    let mut pending = PendingMap::new();
    let mut next_wire_id: u64 = 1;
    let mut buf: Vec<u8> = Vec::with_capacity(8192);
    let mut chunk = vec![0u8; 8192];

    let reason = loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                None | Some(IpcCommand::Close) => break "client dropped".to_string(),
                Some(IpcCommand::Send { mut req, tx }) => {
                    let wire_id = next_wire_id;
                    next_wire_id += 1;
                    let caller_id = std::mem::replace(&mut req.id, RpcId::Number(wire_id));

                    let mut frame = match serde_json::to_vec(&req) {
                        Ok(frame) => frame,
                        Err(e) => {
                            let _ = tx.send(Err(e.into()));
                            continue;
                        }
                    };
                    frame.push(b'\n');
                    register(&mut pending, wire_id, caller_id, tx);
                    if let Err(e) = writer.write_all(&frame).await {
                        break format!("write failed: {e}");
                    }
                }
            },
            read = reader.read(&mut chunk) => match read {
                Ok(0) => break "connection closed by node".to_string(),
                Err(e) => break format!("read failed: {e}"),
                Ok(n) => {
                    buf.extend_from_slice(&chunk[..n]);
                    if let Err(reason) = drain_responses(&mut buf, &mut pending) {
                        break reason;
                    }
                }
            },
        }
    };

    tracing::warn!(reason = %reason, pending = pending.len(), "IPC connection ended");
    for (_, (_, tx)) in pending.drain() {
        let _ = tx.send(Err(TransportError::Ipc(reason.clone())));
    }
}

/// Track a new in-flight request. Entries whose caller has gone away are
/// dropped first, so abandoned requests the node never answers do not pile up.
fn register(pending: &mut PendingMap, wire_id: u64, caller_id: RpcId, tx: Responder) {
    pending.retain(|_, (_, sender)| !sender.is_closed());
    pending.insert(wire_id, (caller_id, tx));
}

/// Route every complete JSON value at the front of `buf` and drop it from
/// the buffer. A trailing partial value is kept for the next read.
fn drain_responses(buf: &mut Vec<u8>, pending: &mut PendingMap) -> Result<(), String> {
    let mut consumed = 0;
    let mut stream = serde_json::Deserializer::from_slice(buf).into_iter::<Value>();
    loop {
        match stream.next() {
            Some(Ok(value)) => {
                consumed = stream.byte_offset();
                route(value, pending);
            }
            Some(Err(e)) if e.is_eof() => break,
            Some(Err(e)) => return Err(format!("malformed data from node: {e}")),
            None => {
                consumed = stream.byte_offset();
                break;
            }
        }
    }
    buf.drain(..consumed);
    Ok(())
}

fn route(value: Value, pending: &mut PendingMap) {
    let mut resp = match serde_json::from_value::<JsonRpcResponse>(value) {
        Ok(resp) => resp,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring non-response IPC message");
            return;
        }
    };
    let Some(wire_id) = resp.id.as_number() else {
        tracing::debug!(id = %resp.id, "ignoring response with foreign id");
        return;
    };
    // The caller may have given up; a closed receiver is fine.
    if let Some((caller_id, tx)) = pending.remove(&wire_id) {
        resp.id = caller_id;
        let _ = tx.send(Ok(resp));
    }
}
