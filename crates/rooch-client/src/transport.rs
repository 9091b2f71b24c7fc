//! The RPC transport boundary and its JSON-RPC 2.0 HTTP implementation.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::TransportError;
use crate::types::ClientConfig;

/// Sends one RPC request and returns its `result`.
///
/// Implementations own timeouts and cancellation; the client adds neither.
pub trait RpcTransport: Send + Sync {
    /// Call `method` with positional `params`.
    fn request(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC 2.0 over HTTP POST.
#[derive(Debug)]
pub struct HttpTransport {
    /// Transport configuration.
    config: ClientConfig,
    /// Underlying HTTP client.
    client: reqwest::Client,
    /// Id of the next request.
    next_id: AtomicU64,
}

impl HttpTransport {
    /// Create a transport from `config`.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self {
            config,
            client,
            next_id: AtomicU64::new(1),
        })
    }

    /// The endpoint URL.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Build common headers from config. Headers that are not valid HTTP
    /// header names or values are skipped.
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &self.config.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }

        headers
    }
}

impl RpcTransport for HttpTransport {
    async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(id, method, url = %self.config.url, "rpc request");

        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let resp = self
            .client
            .post(&self.config.url)
            .headers(self.build_headers())
            .body(serde_json::to_vec(&body)?)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(TransportError::ServerError {
                status_code: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        let parsed: JsonRpcResponse = serde_json::from_str(&text)?;

        if let Some(error) = parsed.error {
            debug!(id, method, code = error.code, "rpc error");
            return Err(TransportError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        // A null result is legitimate for some methods.
        Ok(parsed.result.unwrap_or(Value::Null))
    }
}
