//! Placeholder WebSocket transport
//!
//! Satisfies the `Transport` contract without opening a socket. It always
//! answers `{"jsonrpc": "2.0", "result": "pong", "id": 1}` and logs the target
//! address.

use async_trait::async_trait;
use jrpc_core::Result;
use serde_json::{json, Value};

use crate::transport::{Transport, TransportRequest};

/// WebSocket transport stub
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketTransport;

impl WebSocketTransport {
    /// Create the stub transport
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    fn name(&self) -> &'static str {
        "websocket"
    }

    fn schemes(&self) -> &'static [&'static str] {
        &["ws", "wss"]
    }

    async fn call(&self, request: TransportRequest<'_>) -> Result<Value> {
        let endpoint = request.endpoint;
        tracing::info!(
            target_address = %format!("{}://{}", endpoint.scheme(), endpoint.authority()),
            method = request.method,
            call_id = request.call_id,
            "WebSocket call (placeholder, no socket opened)"
        );

        Ok(json!({"jsonrpc": "2.0", "result": "pong", "id": 1}))
    }
}
