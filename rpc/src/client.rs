//! HTTP JSON-RPC 2.0 client.

use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::RpcError;
use crate::node::NodeRpc;

/// `reqwest`-backed [`NodeRpc`] for one node endpoint.
///
/// Cheap to share: the inner `reqwest::Client` pools connections and the
/// request id is an atomic counter.
pub struct HttpMessenger {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpMessenger {
    /// Create a client targeting `url` (e.g. `https://api.s0.example.io`).
    pub fn new(url: impl Into<String>) -> Result<Self, RpcError> {
        Self::with_timeout(url, Duration::from_secs(30))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| RpcError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    /// The configured endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl NodeRpc for HttpMessenger {
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        tracing::trace!(url = %self.url, method, id, "rpc call");

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RpcError::Http(response.status().as_u16()));
        }

        let mut reply: Value = response
            .json()
            .await
            .map_err(|e| RpcError::invalid(method, format!("invalid JSON: {e}")))?;

        if let Some(err) = reply.get("error").filter(|e| !e.is_null()) {
            return Err(RpcError::Node {
                code: err.get("code").and_then(Value::as_i64).unwrap_or(0),
                message: err
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| err.to_string()),
            });
        }

        match reply.get_mut("result") {
            Some(result) => Ok(result.take()),
            None => Err(RpcError::invalid(method, "reply has neither result nor error")),
        }
    }
}
