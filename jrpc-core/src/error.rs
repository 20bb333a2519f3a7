//! Error types for jrpc
//!
//! This module provides error handling for every stage of a JSON-RPC 2.0 call.
//! It defines two main error types:
//!
//! - **Error**: Local failures raised by the client core (uses thiserror)
//! - **JsonRpcErrorData**: Wire-format JSON-RPC 2.0 error objects
//!
//! # Local errors vs protocol errors
//!
//! An `Error` means the call could not be carried out: the URL or version was
//! rejected at construction time, the params had the wrong shape, the network
//! failed, or the body could not be decoded.
//!
//! A `JsonRpcErrorData` is something the *server* sent back inside a perfectly
//! good HTTP response. Receiving one is not a local failure; it only becomes an
//! `Error::JsonRpc` when the caller asks for it via `CallOutcome::into_result`.
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::{Error, JsonRpcErrorData};
//!
//! let error = Error::UnsupportedVersion("1.0".into());
//! assert_eq!(error.to_string(), "Version \"1.0\" is not supported");
//!
//! let wire = JsonRpcErrorData::new(-32601, "Method not found");
//! assert_eq!(wire.to_string(), "[-32601] Method not found");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for jrpc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Standard JSON-RPC 2.0 error codes
pub mod codes {
    /// Invalid JSON was received by the server
    pub const PARSE_ERROR: i64 = -32700;
    /// The JSON sent is not a valid Request object
    pub const INVALID_REQUEST: i64 = -32600;
    /// The method does not exist / is not available
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Invalid method parameter(s)
    pub const INVALID_PARAMS: i64 = -32602;
    /// Internal JSON-RPC error
    pub const INTERNAL_ERROR: i64 = -32603;
    /// Lowest code of the implementation-defined server error range
    pub const SERVER_ERROR_MIN: i64 = -32099;
    /// Highest code of the implementation-defined server error range
    pub const SERVER_ERROR_MAX: i64 = -32000;
}

/// Local error type for jrpc operations
///
/// # Error Categories
///
/// - **Construction errors**: MalformedUrl, UnsupportedVersion
/// - **Per-call validation**: UnsupportedScheme, InvalidParams, InvalidInput
/// - **Transport errors**: Connection, Http, Tls, Timeout, Io
/// - **Decoding errors**: ResponseDecode, Serialization
/// - **Protocol errors** (opt-in): JsonRpc
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// JSON-RPC error object returned by the server
    ///
    /// Only produced when a caller explicitly converts a decoded response
    /// into a `Result`; transports never return it.
    #[error("JSON-RPC error: {0}")]
    JsonRpc(#[from] JsonRpcErrorData),

    /// The server URL could not be decomposed into scheme and host
    #[error("Malformed URL \"{url}\": {reason}")]
    MalformedUrl {
        /// The URL text as given
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The requested JSON-RPC protocol version is not supported
    #[error("Version \"{0}\" is not supported")]
    UnsupportedVersion(String),

    /// The transport cannot carry calls for this URL scheme
    #[error("Scheme \"{0}\" is not supported by this transport")]
    UnsupportedScheme(String),

    /// Params are neither a JSON object nor a JSON array
    #[error("Params {0} are invalid: expected a JSON object or array")]
    InvalidParams(String),

    /// Input handed over by the hosting application failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The response body was not UTF-8 or not valid JSON
    #[error("Failed to decode response: {0}")]
    ResponseDecode(String),

    /// Serialization of an outgoing message failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Client certificate material or TLS context could not be built
    #[error("TLS error: {0}")]
    Tls(String),

    /// The connection to the server could not be established
    #[error("Connection failed: {0}")]
    Connection(String),

    /// HTTP exchange failed after the connection was established
    #[error("HTTP error: {0}")]
    Http(String),

    /// Input/output error
    #[error("IO error: {0}")]
    Io(String),

    /// The transport's own timeout elapsed
    #[error("Request timeout")]
    Timeout,

    /// Unexpected internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Short, stable label for this error, used as a metrics attribute
    pub fn kind(&self) -> &'static str {
        match self {
            Error::JsonRpc(_) => "json_rpc",
            Error::MalformedUrl { .. } => "malformed_url",
            Error::UnsupportedVersion(_) => "unsupported_version",
            Error::UnsupportedScheme(_) => "unsupported_scheme",
            Error::InvalidParams(_) => "invalid_params",
            Error::InvalidInput(_) => "invalid_input",
            Error::ResponseDecode(_) => "response_decode",
            Error::Serialization(_) => "serialization",
            Error::Tls(_) => "tls",
            Error::Connection(_) => "connection",
            Error::Http(_) => "http",
            Error::Io(_) => "io",
            Error::Timeout => "timeout",
            Error::Internal(_) => "internal",
        }
    }

    /// Whether the error was raised before any network activity
    pub fn is_local_validation(&self) -> bool {
        matches!(
            self,
            Error::MalformedUrl { .. }
                | Error::UnsupportedVersion(_)
                | Error::UnsupportedScheme(_)
                | Error::InvalidParams(_)
                | Error::InvalidInput(_)
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// JSON-RPC 2.0 error object as it appears in the `error` member of a response
///
/// According to JSON-RPC 2.0 an error object MUST contain an integer `code`
/// and a string `message`, and MAY contain `data`.
///
/// The code is kept as `i64` so that out-of-range codes from misbehaving
/// servers still deserialize and fall into the unknown category.
///
/// # Examples
///
/// ```rust
/// use jrpc_core::JsonRpcErrorData;
/// use serde_json::json;
///
/// let error = JsonRpcErrorData::with_data(
///     -32050,
///     "Database unavailable",
///     json!({"retry_after": 5})
/// );
/// assert_eq!(error.code, -32050);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorData {
    /// Numeric error code
    pub code: i64,

    /// Short description of the error
    #[serde(default)]
    pub message: String,

    /// Optional additional error information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcErrorData {
    /// Create a new JSON-RPC error with code and message
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create a new JSON-RPC error with additional data
    pub fn with_data(code: i64, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl std::fmt::Display for JsonRpcErrorData {
    /// Formats as "[code] message", e.g. "[-32601] Method not found"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcErrorData {}
