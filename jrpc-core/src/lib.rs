//! Core JSON-RPC 2.0 types, codec and error decoding for jrpc
//!
//! This crate holds everything about a JSON-RPC call that does not depend on
//! how bytes move across the network:
//!
//! - **Types**: the request object and request/response ids
//! - **Version**: validation of the protocol version (`"2.0"` only)
//! - **Codec**: params shape checks, request encoding, response body decoding
//! - **Decode**: mapping of error codes to categories, `CallOutcome`
//! - **Input**: validation of `(method, params text)` pairs from a front-end
//! - **Error handling**: the crate-wide `Error` and `Result`
//! - **Observability**: optional tracing/OpenTelemetry bootstrap
//!
//! Transports and the call orchestration live in `jrpc-client`.
//!
//! # Example
//!
//! ```rust
//! use jrpc_core::{codec, CallOutcome, ErrorCategory, ProtocolVersion};
//! use serde_json::json;
//!
//! let request = codec::build_request(ProtocolVersion::V2, "add", Some(json!([1, 2])), 1).unwrap();
//! assert_eq!(request.method, "add");
//!
//! let body = br#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found"},"id":1}"#;
//! let outcome = CallOutcome::from_response(codec::decode_response_body(body).unwrap());
//! assert_eq!(outcome.decoded_error().unwrap().category, ErrorCategory::MethodNotFound);
//! ```

pub mod codec;
pub mod decode;
pub mod error;
pub mod input;
pub mod observability;
pub mod types;
pub mod version;

pub use decode::{decode, CallOutcome, DecodedError, ErrorCategory};
pub use error::{Error, JsonRpcErrorData, Result};
pub use input::CallInput;
pub use observability::{init_observability, shutdown_observability, ObservabilityConfig};
pub use types::{Id, JsonRpcRequest};
pub use version::ProtocolVersion;
