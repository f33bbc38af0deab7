use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{consts::RPC_PATH, prelude::*, Error};

/// HTTP status codes that indicate transient server errors (retryable)
const RETRYABLE_STATUS_CODES: &[u16] = &[502, 503, 504];

/// Maximum number of retry attempts for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds (doubles with each retry)
const INITIAL_BACKOFF_MS: u64 = 100;

#[derive(Deserialize, Debug)]
struct ErrorData {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorData,
}

#[derive(Serialize, Debug)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize, Debug)]
struct RpcResponse<R> {
    result: Option<R>,
    error: Option<ErrorData>,
}

#[derive(Debug)]
pub struct HttpClient {
    pub client: Client,
    pub base_url: String,
    next_id: AtomicU64,
}

async fn parse_response(response: Response) -> Result<String> {
    let status_code = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| Error::GenericRequest(e.to_string()))?;

    if status_code < 400 {
        return Ok(text);
    }
    let error_data = serde_json::from_str::<ErrorEnvelope>(&text);
    if (400..500).contains(&status_code) {
        let client_error = match error_data {
            Ok(ErrorEnvelope { error }) => Error::ClientRequest {
                status_code,
                error_code: Some(error.code),
                error_message: error.message,
                error_data: error.data.map(|d| d.to_string()),
            },
            Err(err) => Error::ClientRequest {
                status_code,
                error_message: text,
                error_code: None,
                error_data: Some(err.to_string()),
            },
        };
        return Err(client_error);
    }

    Err(Error::ServerRequest {
        status_code,
        error_message: text,
    })
}

impl HttpClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url,
            next_id: AtomicU64::new(1),
        }
    }

    /// Send a POST request with automatic retry for transient server errors (502, 503, 504).
    ///
    /// Uses exponential backoff: 100ms, 200ms, 400ms between retries.
    pub async fn post(&self, url_path: &'static str, data: String) -> Result<String> {
        let full_url = format!("{}{url_path}", self.base_url);

        for attempt in 0..=MAX_RETRIES {
            let request = self
                .client
                .post(&full_url)
                .header("Content-Type", "application/json")
                .body(data.clone())
                .build()
                .map_err(|e| Error::GenericRequest(e.to_string()))?;

            let result = self
                .client
                .execute(request)
                .await
                .map_err(|e| Error::GenericRequest(e.to_string()))?;

            let status = result.status().as_u16();

            if RETRYABLE_STATUS_CODES.contains(&status) && attempt < MAX_RETRIES {
                let backoff = Duration::from_millis(INITIAL_BACKOFF_MS * 2u64.pow(attempt));
                warn!(
                    status = status,
                    attempt = attempt + 1,
                    max_attempts = MAX_RETRIES + 1,
                    backoff_ms = backoff.as_millis(),
                    url = %url_path,
                    "Retryable HTTP error, backing off"
                );
                tokio::time::sleep(backoff).await;
                continue;
            }

            return parse_response(result).await;
        }

        Err(Error::GenericRequest(format!(
            "Max retries ({MAX_RETRIES}) exceeded for {url_path}"
        )))
    }

    /// Issue a JSON-RPC 2.0 call against the gateway's RPC endpoint.
    pub async fn rpc_call<P, R>(&self, method: &str, params: P) -> Result<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::to_string(&RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        })
        .map_err(|e| Error::json_parse(e.to_string()))?;

        debug!(method, id, "Sending RPC request");
        let text = self.post(RPC_PATH, body).await?;
        decode_rpc_response(&text)
    }
}

fn decode_rpc_response<R: DeserializeOwned>(text: &str) -> Result<R> {
    let response: RpcResponse<R> =
        serde_json::from_str(text).map_err(|e| Error::json_parse(e.to_string()))?;

    if let Some(error) = response.error {
        return Err(Error::Rpc {
            code: error.code,
            message: error.message,
        });
    }
    response
        .result
        .ok_or_else(|| Error::json_parse("RPC response has neither result nor error"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Pong {
        ok: bool,
    }

    #[test]
    fn test_decode_result() {
        let pong: Pong =
            decode_rpc_response(r#"{"jsonrpc":"2.0","id":1,"result":{"ok":true}}"#).unwrap();
        assert_eq!(pong, Pong { ok: true });
    }

    #[test]
    fn test_decode_error() {
        let err = decode_rpc_response::<Pong>(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32001,"message":"stream not found"}}"#,
        )
        .unwrap_err();
        match err {
            Error::Rpc { code, message } => {
                assert_eq!(code, -32001);
                assert_eq!(message, "stream not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_empty_envelope() {
        let err = decode_rpc_response::<Pong>(r#"{"jsonrpc":"2.0","id":1}"#).unwrap_err();
        assert!(matches!(err, Error::JsonParse(_)));
    }

    #[test]
    fn test_request_serialization() {
        let body = serde_json::to_value(RpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: "user.health",
            params: serde_json::json!({}),
        })
        .unwrap();
        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["id"], 7);
        assert_eq!(body["method"], "user.health");
    }
}
