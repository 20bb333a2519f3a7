//! Transport layer for the JSON-RPC client
//!
//! A transport carries one JSON-RPC request to a server and brings back the
//! decoded response body. `JrpcServer` only ever talks to `dyn Transport`, so
//! tests can substitute a fake and new protocols can be added without touching
//! call semantics.

use async_trait::async_trait;
use jrpc_core::{ProtocolVersion, Result};
use serde_json::Value;

use crate::credentials::ClientCredentials;
use crate::endpoint::Endpoint;

pub mod http;
pub mod websocket;

pub use http::{HttpTransport, HttpTransportConfig};
pub use websocket::WebSocketTransport;

/// Everything a transport needs for one call
#[derive(Debug, Clone)]
pub struct TransportRequest<'a> {
    /// Parsed server address
    pub endpoint: &'a Endpoint,
    /// Validated protocol version
    pub version: ProtocolVersion,
    /// Remote method name
    pub method: &'a str,
    /// Call params; must be an object, array or absent
    pub params: Option<Value>,
    /// Request id
    pub call_id: i64,
    /// Client certificate material, scoped to this call
    pub credentials: Option<&'a ClientCredentials>,
}

/// Capability to perform a single JSON-RPC call
///
/// Implementations open at most one connection per call and close it before
/// returning, on success and on error. The returned value is the response body
/// as parsed JSON; `error` members are not interpreted.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short name of the transport, used in logs and metrics
    fn name(&self) -> &'static str;

    /// Schemes this transport accepts
    fn schemes(&self) -> &'static [&'static str];

    /// Send the request and return the decoded response body
    async fn call(&self, request: TransportRequest<'_>) -> Result<Value>;
}
