//! Codec for JSON-RPC request construction and response decoding
//!
//! Outgoing side: `build_request` validates the params shape and fills in the
//! defaults, `encode_request` turns the request into the wire text.
//!
//! Incoming side: `decode_response_body` turns the raw bytes of a response
//! into a generic JSON value. It does not interpret `result` or `error`
//! members; that is the job of `decode::CallOutcome`.
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::{codec, ProtocolVersion};
//! use serde_json::json;
//!
//! let request = codec::build_request(ProtocolVersion::V2, "ping", None, 1).unwrap();
//! let text = codec::encode_request(&request).unwrap();
//! assert_eq!(text, r#"{"jsonrpc":"2.0","method":"ping","params":{},"id":1}"#);
//!
//! let response = codec::decode_response_body(br#"{"jsonrpc":"2.0","result":"pong","id":1}"#).unwrap();
//! assert_eq!(response["result"], json!("pong"));
//! ```

use crate::error::{Error, Result};
use crate::types::{Id, JsonRpcRequest};
use crate::version::ProtocolVersion;
use serde::Serialize;
use serde_json::Value;

/// Encode any serializable message to a JSON string
pub fn encode<T: Serialize>(msg: &T) -> Result<String> {
    serde_json::to_string(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Encode a JSON-RPC request to JSON
pub fn encode_request(req: &JsonRpcRequest) -> Result<String> {
    encode(req)
}

/// Check the shape of call params and apply the empty default
///
/// - absent, `null`, `{}` and `[]` all become `{}`
/// - non-empty objects and arrays are passed through
/// - any scalar is rejected with `Error::InvalidParams`
pub fn normalize_params(params: Option<Value>) -> Result<Value> {
    match params {
        None | Some(Value::Null) => Ok(Value::Object(Default::default())),
        Some(Value::Object(map)) => Ok(Value::Object(map)),
        Some(Value::Array(items)) if items.is_empty() => Ok(Value::Object(Default::default())),
        Some(Value::Array(items)) => Ok(Value::Array(items)),
        Some(scalar) => Err(Error::InvalidParams(scalar.to_string())),
    }
}

/// Build a JSON-RPC request from possibly-untrusted params
///
/// Fails with `Error::InvalidParams` before anything is serialized when the
/// params are a scalar.
pub fn build_request(
    version: ProtocolVersion,
    method: impl Into<String>,
    params: Option<Value>,
    call_id: i64,
) -> Result<JsonRpcRequest> {
    let params = normalize_params(params)?;
    Ok(JsonRpcRequest {
        jsonrpc: version.as_str().to_string(),
        method: method.into(),
        params,
        id: Id::Number(call_id),
    })
}

/// Decode a raw response body into a JSON value
///
/// Fails with `Error::ResponseDecode` if the body is not UTF-8 or not JSON.
/// The value is returned as-is; an `error` member is not treated as a failure.
pub fn decode_response_body(body: &[u8]) -> Result<Value> {
    let text = std::str::from_utf8(body)
        .map_err(|e| Error::ResponseDecode(format!("body is not valid UTF-8: {}", e)))?;
    serde_json::from_str(text)
        .map_err(|e| Error::ResponseDecode(format!("body is not valid JSON: {}", e)))
}
