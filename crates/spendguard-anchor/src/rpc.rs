use crate::error::AnchorError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// One JSON-RPC round trip. `Ok(JsonValue::Null)` means the node answered `null`.
pub trait RpcTransport {
    fn call(&self, method: &str, params: JsonValue) -> Result<JsonValue, AnchorError>;
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: JsonValue,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<JsonValue>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Blocking HTTP JSON-RPC client.
pub struct JsonRpcClient {
    client: reqwest::blocking::Client,
    url: String,
    request_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AnchorError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            request_id: AtomicU64::new(1),
        })
    }
}

impl RpcTransport for JsonRpcClient {
    fn call(&self, method: &str, params: JsonValue) -> Result<JsonValue, AnchorError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        debug!(method, id, "json-rpc call");

        let response: RpcResponse = self
            .client
            .post(&self.url)
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;

        if let Some(error) = response.error {
            return Err(AnchorError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(response.result.unwrap_or(JsonValue::Null))
    }
}

/// Parse an Ethereum hex quantity (`0x1a`).
pub fn parse_quantity(raw: &str) -> Option<u128> {
    let digits = raw.strip_prefix("0x")?;
    if digits.is_empty() {
        return None;
    }
    u128::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities() {
        assert_eq!(parse_quantity("0x0"), Some(0));
        assert_eq!(parse_quantity("0x1"), Some(1));
        assert_eq!(parse_quantity("0xa5f0"), Some(42480));
        assert_eq!(parse_quantity("0x"), None);
        assert_eq!(parse_quantity("15"), None);
        assert_eq!(parse_quantity("0xnope"), None);
    }

    #[test]
    fn error_member_wins_over_result() {
        let response: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc": "2.0", "id": 1, "error": {"code": -32000, "message": "insufficient funds"}}"#,
        )
        .expect("parse response");
        let error = response.error.expect("error member");
        assert_eq!(error.code, -32000);
        assert!(response.result.is_none());
    }

    #[test]
    fn request_shape() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: "eth_chainId",
            params: serde_json::json!([]),
        };
        let value = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(
            value,
            serde_json::json!({"jsonrpc": "2.0", "id": 7, "method": "eth_chainId", "params": []})
        );
    }
}
