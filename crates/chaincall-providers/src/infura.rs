//! Infura gateway transport.

use async_trait::async_trait;

use chaincall_core::error::TransportError;
use chaincall_core::request::{JsonRpcRequest, JsonRpcResponse};
use chaincall_core::transport::RpcTransport;
use chaincall_http::{BasicAuth, HttpClientConfig, HttpRpcClient};

const GATEWAY_HOST: &str = "infura.io";

/// Project credentials issued by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfuraCredentials {
    pub project_id: String,
    /// Sent as the basic-auth password when the project requires it.
    pub project_secret: Option<String>,
}

impl InfuraCredentials {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            project_secret: None,
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.project_secret = Some(secret.into());
        self
    }
}

pub fn http_url(project_id: &str, chain_id: u64) -> String {
    let network = chain_id_to_network(chain_id);
    format!("https://{network}.{GATEWAY_HOST}/v3/{project_id}")
}

fn chain_id_to_network(chain_id: u64) -> &'static str {
    match chain_id {
        1 => "mainnet",
        11155111 => "sepolia",
        17000 => "holesky",
        137 => "polygon-mainnet",
        80002 => "polygon-amoy",
        42161 => "arbitrum-mainnet",
        10 => "optimism-mainnet",
        8453 => "base-mainnet",
        59144 => "linea-mainnet",
        _ => "mainnet",
    }
}

/// True if `url` points at the hosted gateway.
pub fn is_gateway_url(url: &str) -> bool {
    url.starts_with("http") && url.contains(GATEWAY_HOST)
}

/// Project id from a gateway URL of the form `.../v3/{project_id}`.
fn project_id_from_url(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("/v3/")?;
    let id = rest.split(['/', '?', '#']).next()?;
    (!id.is_empty()).then_some(id)
}

/// HTTP transport bound to an Infura project.
pub struct InfuraTransport {
    inner: HttpRpcClient,
    project_id: String,
}

impl InfuraTransport {
    /// Transport for the network identified by `chain_id`. Unknown chain ids
    /// fall back to mainnet.
    pub fn new(creds: InfuraCredentials, chain_id: u64) -> Result<Self, TransportError> {
        let url = http_url(&creds.project_id, chain_id);
        Self::build(url, creds)
    }

    /// Transport for a full gateway URL, e.g.
    /// `https://sepolia.infura.io/v3/<project_id>`.
    pub fn from_url(url: &str, project_secret: Option<String>) -> Result<Self, TransportError> {
        if !is_gateway_url(url) {
            return Err(TransportError::Http(format!("not a gateway URL: {url}")));
        }
        let project_id = project_id_from_url(url)
            .ok_or_else(|| TransportError::Http(format!("gateway URL has no project id: {url}")))?;
        let creds = InfuraCredentials {
            project_id: project_id.to_string(),
            project_secret,
        };
        Self::build(url.to_string(), creds)
    }

    fn build(url: String, creds: InfuraCredentials) -> Result<Self, TransportError> {
        let config = HttpClientConfig {
            basic_auth: creds.project_secret.map(|secret| BasicAuth {
                username: String::new(),
                password: Some(secret),
            }),
            ..Default::default()
        };
        let inner = HttpRpcClient::new(url, config)?;
        tracing::debug!(project = %creds.project_id, url = %inner.url(), "using hosted gateway");
        Ok(Self {
            inner,
            project_id: creds.project_id,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

#[async_trait]
impl RpcTransport for InfuraTransport {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        self.inner.send(req).await
    }

    fn url(&self) -> &str {
        self.inner.url()
    }
}
