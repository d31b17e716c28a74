//! JSON-RPC 2.0 over a blocking WebSocket.
//!
//! One request in flight at a time. Frames whose `id` does not match the
//! pending request (subscription notifications, stale replies) are skipped.

use std::net::TcpStream;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

use super::probe::ChainInfo;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("failed to connect to {0}")]
    Connect(String, #[source] tungstenite::Error),

    #[error("websocket error")]
    Transport(#[from] tungstenite::Error),

    #[error("malformed JSON-RPC payload")]
    Json(#[from] serde_json::Error),

    #[error("`{method}` failed ({code}): {message}")]
    Remote {
        method: String,
        code: i64,
        message: String,
    },

    #[error("connection closed while waiting for `{0}`")]
    Closed(String),

    #[error("unexpected response to `{method}`: {detail}")]
    InvalidResponse { method: String, detail: String },
}

#[derive(Debug, Deserialize)]
struct Response {
    id: Option<Value>,
    result: Option<Value>,
    error: Option<ErrorObject>,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
}

/// Subset of a block header.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    #[serde(deserialize_with = "hex_number")]
    pub number: u64,
    pub parent_hash: String,
}

fn hex_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_hex(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid hex number `{raw}`")))
}

/// `"0x1a"` → 26
pub fn parse_hex(raw: &str) -> Option<u64> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

pub struct RpcClient {
    socket: WebSocket<MaybeTlsStream<TcpStream>>,
    next_id: u64,
}

impl RpcClient {
    /// Open the WebSocket. `timeout` bounds every subsequent read; zero
    /// leaves reads unbounded.
    pub fn connect(endpoint: &str, timeout: Duration) -> Result<Self, RpcError> {
        let (socket, _) = tungstenite::connect(endpoint)
            .map_err(|e| RpcError::Connect(endpoint.to_string(), e))?;

        if let MaybeTlsStream::Plain(stream) = socket.get_ref() {
            stream
                .set_read_timeout(Some(timeout).filter(|t| !t.is_zero()))
                .map_err(|e| RpcError::Transport(e.into()))?;
        }

        Ok(Self { socket, next_id: 1 })
    }

    /// Send `method` and wait for the reply carrying the same id.
    pub fn call<T: DeserializeOwned>(&mut self, method: &str, params: Value) -> Result<T, RpcError> {
        let id = self.next_id;
        self.next_id += 1;

        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        self.socket.send(Message::Text(request.to_string().into()))?;

        loop {
            let text = match self.socket.read() {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(_))
                | Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                    return Err(RpcError::Closed(method.to_string()));
                }
                // ping/pong are answered inside tungstenite
                Ok(_) => continue,
                Err(e) => return Err(e.into()),
            };

            let response: Response = serde_json::from_str(text.as_str())?;
            if response.id.as_ref().and_then(Value::as_u64) != Some(id) {
                crate::debug!("rpc"; "skipping unrelated frame");
                continue;
            }

            if let Some(error) = response.error {
                return Err(RpcError::Remote {
                    method: method.to_string(),
                    code: error.code,
                    message: error.message,
                });
            }

            let result = response.result.ok_or_else(|| RpcError::InvalidResponse {
                method: method.to_string(),
                detail: "neither result nor error".into(),
            })?;
            return serde_json::from_value(result).map_err(|e| RpcError::InvalidResponse {
                method: method.to_string(),
                detail: e.to_string(),
            });
        }
    }

    pub fn system_chain(&mut self) -> Result<String, RpcError> {
        self.call("system_chain", json!([]))
    }

    pub fn system_name(&mut self) -> Result<String, RpcError> {
        self.call("system_name", json!([]))
    }

    pub fn system_version(&mut self) -> Result<String, RpcError> {
        self.call("system_version", json!([]))
    }

    /// Header of the best block.
    pub fn chain_get_header(&mut self) -> Result<Header, RpcError> {
        self.call("chain_getHeader", json!([]))
    }

    pub fn chain_info(&mut self) -> Result<ChainInfo, RpcError> {
        Ok(ChainInfo {
            chain: self.system_chain()?,
            name: self.system_name()?,
            version: self.system_version()?,
            best_number: self.chain_get_header()?.number,
        })
    }

    /// Send a close frame; errors are ignored.
    pub fn close(mut self) {
        let _ = self.socket.close(None);
        let _ = self.socket.flush();
    }
}
