//! Endpoint descriptor resolution.
//!
//! The `--url` value picks the transport:
//!
//! | descriptor                    | transport                  |
//! |-------------------------------|----------------------------|
//! | unset                         | IPC, default socket paths  |
//! | `http…` containing `infura.io`| hosted gateway             |
//! | other `http…`                 | plain HTTP                 |
//! | existing filesystem path      | IPC at that path           |

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use chaincall_core::RpcTransport;
use chaincall_http::HttpRpcClient;
use chaincall_providers::{is_gateway_url, InfuraTransport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Try the platform-default IPC sockets.
    DefaultIpc,
    Ipc(PathBuf),
    Gateway(String),
    Http(String),
}

impl Endpoint {
    pub fn resolve(descriptor: Option<&str>) -> Result<Self> {
        let Some(descriptor) = descriptor else {
            return Ok(Self::DefaultIpc);
        };
        if descriptor.starts_with("http") {
            if is_gateway_url(descriptor) {
                return Ok(Self::Gateway(descriptor.to_string()));
            }
            return Ok(Self::Http(descriptor.to_string()));
        }
        if Path::new(descriptor).exists() {
            return Ok(Self::Ipc(PathBuf::from(descriptor)));
        }
        bail!("unrecognised endpoint {descriptor:?}: expected an http(s) URL or an IPC socket path")
    }

    /// Open the transport. Only IPC touches the network here; HTTP and
    /// gateway transports connect on first request.
    pub async fn connect(&self, gateway_secret: Option<String>) -> Result<Arc<dyn RpcTransport>> {
        let transport: Arc<dyn RpcTransport> = match self {
            Self::Http(url) => Arc::new(HttpRpcClient::default_for(url.as_str())?),
            Self::Gateway(url) => Arc::new(InfuraTransport::from_url(url, gateway_secret)?),
            Self::Ipc(path) => connect_ipc(Some(path)).await?,
            Self::DefaultIpc => connect_ipc(None).await?,
        };
        tracing::debug!(endpoint = %transport.url(), "transport ready");
        Ok(transport)
    }
}

#[cfg(unix)]
async fn connect_ipc(path: Option<&Path>) -> Result<Arc<dyn RpcTransport>> {
    use chaincall_ipc::IpcRpcClient;

    let client = match path {
        Some(path) => IpcRpcClient::connect(path)
            .await
            .with_context(|| format!("connecting to {}", path.display()))?,
        None => IpcRpcClient::dial()
            .await
            .context("no --url given and no local node found")?,
    };
    Ok(Arc::new(client))
}

#[cfg(not(unix))]
async fn connect_ipc(_path: Option<&Path>) -> Result<Arc<dyn RpcTransport>> {
    bail!("IPC endpoints are only supported on unix; pass an http(s) --url")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_means_default_ipc() {
        assert_eq!(Endpoint::resolve(None).unwrap(), Endpoint::DefaultIpc);
    }

    #[test]
    fn http_urls() {
        assert_eq!(
            Endpoint::resolve(Some("http://localhost:8545")).unwrap(),
            Endpoint::Http("http://localhost:8545".into())
        );
        assert_eq!(
            Endpoint::resolve(Some("https://mainnet.infura.io/v3/abc")).unwrap(),
            Endpoint::Gateway("https://mainnet.infura.io/v3/abc".into())
        );
    }

    #[test]
    fn existing_path_is_ipc() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geth.ipc");
        std::fs::write(&path, b"").unwrap();
        let descriptor = path.to_str().unwrap();
        assert_eq!(
            Endpoint::resolve(Some(descriptor)).unwrap(),
            Endpoint::Ipc(path.clone())
        );
    }

    #[test]
    fn anything_else_is_rejected() {
        assert!(Endpoint::resolve(Some("/definitely/not/here.ipc")).is_err());
        assert!(Endpoint::resolve(Some("ws://localhost:8546")).is_err());
    }

    #[tokio::test]
    async fn gateway_without_project_id_fails_to_connect() {
        let endpoint = Endpoint::Gateway("https://mainnet.infura.io/".into());
        assert!(endpoint.connect(None).await.is_err());
    }
}
