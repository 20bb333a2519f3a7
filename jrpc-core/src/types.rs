//! JSON-RPC 2.0 wire types
//!
//! Only the client side of the protocol is modelled here: the request object
//! that goes out and the identifier that correlates it with a response.
//! Responses are handled as generic `serde_json::Value`s, because servers in
//! the wild do not always honour the response shape; see `decode::CallOutcome`
//! for the tolerant interpretation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON-RPC 2.0 request ID
///
/// JSON-RPC 2.0 allows string, number, or null IDs. Requests built by this crate
/// always use numbers; the other variants exist so that the `id` member of an
/// arbitrary response can be represented.
///
/// # Examples
///
/// ```rust
/// use jrpc_core::Id;
///
/// let id: Id = 42i64.into();
/// assert_eq!(id.to_string(), "42");
/// assert_eq!(Id::from("req-1").to_string(), "\"req-1\"");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// Numeric identifier
    Number(i64),
    /// String identifier
    String(String),
    /// Null identifier, used by servers that could not read the request id
    #[default]
    Null,
}

impl Id {
    /// Read the `id` member of a response value
    ///
    /// Missing members and values that are not a valid id map to `None`.
    pub fn from_response(response: &serde_json::Value) -> Option<Self> {
        response
            .get("id")
            .and_then(|id| serde_json::from_value(id.clone()).ok())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::String(s) => write!(f, "\"{}\"", s),
            Id::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::String(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

/// JSON-RPC 2.0 request message
///
/// Field order matches the wire order `jsonrpc, method, params, id`.
/// `params` is always present: absent parameters are sent as `{}`.
/// Use `codec::build_request` to construct one from untrusted params, since it
/// enforces the object-or-array rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always a validated version string
    pub jsonrpc: String,
    /// Name of the remote method to invoke
    pub method: String,
    /// Structured parameters, a JSON object or array
    pub params: serde_json::Value,
    /// Identifier to correlate this request with its response
    pub id: Id,
}
