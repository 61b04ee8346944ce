//! JSON-RPC 2.0 transport over HTTP.
//!
//! Every request is a single `POST` of a JSON-RPC envelope. Responses are
//! unwrapped into their `result` value, or into [`ChainError::Rpc`] when the
//! endpoint answers with an error object. There is no retry.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Value, json};
use tracing::debug;

use crate::error::ChainError;

/// A JSON-RPC transport bound to one endpoint.
#[derive(Debug)]
pub struct JsonRpcTransport {
    client: reqwest::Client,
    url: String,
    request_id: AtomicU64,
}

impl JsonRpcTransport {
    /// Create a transport with a default `reqwest` client.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    /// Create a transport with a preconfigured client (e.g. default headers).
    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            url: url.into(),
            request_id: AtomicU64::new(1),
        }
    }

    /// The endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one request and return its `result`.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Http`] if the request fails or the status is not
    /// a success, [`ChainError::Rpc`] for JSON-RPC error objects, and
    /// [`ChainError::Decode`] if the body is not a JSON-RPC response.
    pub async fn request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(url = self.url, method, id, "sending JSON-RPC request");

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainError::Http(format!("{method} request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(ChainError::Http(format!(
                "{method} returned {status}: {error_body}"
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ChainError::Decode(format!("{method} response parse failed: {e}")))?;

        extract_result(json)
    }
}

/// Unwrap a JSON-RPC response envelope.
fn extract_result(mut json: Value) -> Result<Value, ChainError> {
    if let Some(error) = json.get("error").filter(|e| e.is_object()) {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_owned();
        return Err(ChainError::Rpc { code, message });
    }

    json.get_mut("result")
        .map(Value::take)
        .ok_or_else(|| ChainError::Decode("response missing result".to_owned()))
}
