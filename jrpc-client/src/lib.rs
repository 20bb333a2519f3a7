//! JSON-RPC 2.0 client with pluggable transports
//!
//! This crate turns a server URL and a `(method, params)` pair into a JSON-RPC
//! call and hands back the server's response.
//!
//! # Core Features
//!
//! - **Endpoint parsing**: scheme, host, port and path resolved once per server
//! - **Version enforcement**: only `"2.0"` is accepted, checked at construction
//! - **HTTP/HTTPS transport**: one POST per call on a fresh connection
//! - **Mutual TLS**: client certificates from in-memory PEM text, never from disk
//! - **WebSocket placeholder**: same contract, canned response
//! - **Observability**: `tracing` spans per call, optional OpenTelemetry metrics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use jrpc_client::{HttpTransport, JrpcServer};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = JrpcServer::new("http://localhost:8080/rpc", "2.0", Arc::new(HttpTransport::new()))?;
//!
//!     // Raw response body
//!     let response = server.call_method("add", Some(json!({"a": 5, "b": 3}))).await?;
//!     println!("Response: {}", response);
//!
//!     // Interpreted response
//!     let outcome = server.call_and_decode("add", Some(json!([5, 3]))).await?;
//!     if let Some(error) = outcome.decoded_error() {
//!         eprintln!("Server said: {}", error);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod endpoint;
mod metrics;
mod server;
mod server_builder;
pub mod transport;

pub use credentials::ClientCredentials;
pub use endpoint::Endpoint;
pub use metrics::CallMetrics;
pub use server::{JrpcServer, DEFAULT_CALL_ID};
pub use server_builder::ServerBuilder;
pub use transport::{
    HttpTransport, HttpTransportConfig, Transport, TransportRequest, WebSocketTransport,
};
