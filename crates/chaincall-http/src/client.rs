//! HTTP JSON-RPC client backed by `reqwest`.
//!
//! One POST per request, no retry: a failed round trip is handed straight
//! back to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use chaincall_core::error::TransportError;
use chaincall_core::request::{JsonRpcRequest, JsonRpcResponse};
use chaincall_core::transport::RpcTransport;

/// HTTP basic credentials sent with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: Option<String>,
}

/// Configuration for `HttpRpcClient`.
#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    /// Whole-request timeout. `None` waits as long as the connection lives.
    pub request_timeout: Option<Duration>,
    pub basic_auth: Option<BasicAuth>,
    /// Extra headers added to every request.
    pub headers: Vec<(String, String)>,
}

/// HTTP JSON-RPC transport.
pub struct HttpRpcClient {
    url: String,
    http: reqwest::Client,
    basic_auth: Option<BasicAuth>,
}

impl HttpRpcClient {
    /// Create a client for the given JSON-RPC endpoint URL.
    ///
    /// The URL must be absolute `http` or `https`; header names and values
    /// must be valid. Nothing is sent until the first request.
    pub fn new(url: impl Into<String>, config: HttpClientConfig) -> Result<Self, TransportError> {
        let url = url.into();
        let parsed = reqwest::Url::parse(&url)
            .map_err(|e| TransportError::Http(format!("invalid URL {url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TransportError::Http(format!(
                "unsupported URL scheme {:?}",
                parsed.scheme()
            )));
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::Http(format!("header {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::Http(format!("header {name}: {e}")))?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| TransportError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url,
            http,
            basic_auth: config.basic_auth,
        })
    }

    /// Create with default configuration.
    pub fn default_for(url: impl Into<String>) -> Result<Self, TransportError> {
        Self::new(url, HttpClientConfig::default())
    }
}

#[async_trait]
impl RpcTransport for HttpRpcClient {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let mut post = self.http.post(&self.url).json(&req);
        if let Some(auth) = &self.basic_auth {
            post = post.basic_auth(&auth.username, auth.password.as_ref());
        }

        let resp = post
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, method = %req.method, url = %self.url, "non-success HTTP status");
            return Err(TransportError::Http(format!("HTTP {status}: {body}")));
        }

        resp.json::<JsonRpcResponse>()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))
    }

    fn url(&self) -> &str {
        &self.url
    }
}
