//! jrpc - JSON-RPC 2.0 client
//!
//! Convenience crate that re-exports the jrpc sub-crates, for users who want a
//! single dependency.
//!
//! - **jrpc-core**: wire types, version validation, codec, error decoding, observability
//! - **jrpc-client**: endpoint parsing, transports, `JrpcServer`
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use jrpc::{HttpTransport, JrpcServer};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = JrpcServer::new("https://rpc.example.com/api", "2.0", Arc::new(HttpTransport::new()))?;
//!
//!     let outcome = server.call_text("getBalance", r#"{"account": "42"}"#).await?;
//!     match outcome.decoded_error() {
//!         Some(error) => eprintln!("{}", error),
//!         None => println!("{}", outcome.response()),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub use jrpc_client as client;
pub use jrpc_core as core;

pub use jrpc_client::{
    ClientCredentials, Endpoint, HttpTransport, HttpTransportConfig, JrpcServer, ServerBuilder,
    Transport, WebSocketTransport,
};
pub use jrpc_core::{CallOutcome, DecodedError, Error, ErrorCategory, Result};
