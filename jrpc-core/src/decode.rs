//! Decoding of JSON-RPC error objects into human-readable categories
//!
//! JSON-RPC 2.0 reserves a handful of exact codes and the range
//! `-32099..=-32000` for server implementations. `decode` maps an error object
//! onto those categories:
//!
//! | code | category |
//! |---|---|
//! | -32700 | `ParseError` |
//! | -32600 | `InvalidRequest` |
//! | -32601 | `MethodNotFound` |
//! | -32602 | `InvalidParams` |
//! | -32603 | `InternalError` |
//! | -32099 ..= -32000 | `ServerError` (message and data echoed) |
//! | anything else | `UnknownError` (message and data echoed) |
//!
//! `CallOutcome` builds on that to split a raw response into success or a
//! decoded failure while keeping the original response around for logging.

use crate::error::{codes, Error, JsonRpcErrorData, Result};
use crate::types::Id;
use serde_json::Value;
use std::fmt;

/// Category of a JSON-RPC error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// -32700
    ParseError,
    /// -32600
    InvalidRequest,
    /// -32601
    MethodNotFound,
    /// -32602
    InvalidParams,
    /// -32603
    InternalError,
    /// -32099 to -32000 inclusive
    ServerError,
    /// Everything else
    UnknownError,
}

impl ErrorCategory {
    /// Categorize a numeric error code
    ///
    /// Exact codes are checked first, then the server range, then the catch-all.
    pub fn from_code(code: i64) -> Self {
        match code {
            codes::PARSE_ERROR => ErrorCategory::ParseError,
            codes::INVALID_REQUEST => ErrorCategory::InvalidRequest,
            codes::METHOD_NOT_FOUND => ErrorCategory::MethodNotFound,
            codes::INVALID_PARAMS => ErrorCategory::InvalidParams,
            codes::INTERNAL_ERROR => ErrorCategory::InternalError,
            codes::SERVER_ERROR_MIN..=codes::SERVER_ERROR_MAX => ErrorCategory::ServerError,
            _ => ErrorCategory::UnknownError,
        }
    }

    /// Stable name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::ParseError => "ParseError",
            ErrorCategory::InvalidRequest => "InvalidRequest",
            ErrorCategory::MethodNotFound => "MethodNotFound",
            ErrorCategory::InvalidParams => "InvalidParams",
            ErrorCategory::InternalError => "InternalError",
            ErrorCategory::ServerError => "ServerError",
            ErrorCategory::UnknownError => "UnknownError",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JSON-RPC error reduced to a category and a readable message
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedError {
    /// Category derived from the code
    pub category: ErrorCategory,
    /// Code as sent by the server
    pub code: i64,
    /// Human-readable description
    pub message: String,
}

impl fmt::Display for DecodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Decode a JSON-RPC error object
///
/// # Examples
///
/// ```rust
/// use jrpc_core::{decode, ErrorCategory, JsonRpcErrorData};
///
/// let decoded = decode(&JsonRpcErrorData::new(-32700, "Parse error"));
/// assert_eq!(decoded.category, ErrorCategory::ParseError);
/// assert_eq!(decoded.message, "Invalid JSON was received by the server.");
///
/// let decoded = decode(&JsonRpcErrorData::new(-32050, "DB down"));
/// assert_eq!(decoded.category, ErrorCategory::ServerError);
/// assert_eq!(decoded.message, "Server error: DB down");
/// ```
pub fn decode(error: &JsonRpcErrorData) -> DecodedError {
    let category = ErrorCategory::from_code(error.code);
    let message = match category {
        ErrorCategory::ParseError => "Invalid JSON was received by the server.".to_string(),
        ErrorCategory::InvalidRequest => "The JSON sent is not a valid Request object.".to_string(),
        ErrorCategory::MethodNotFound => {
            "The method does not exist / is not available.".to_string()
        }
        ErrorCategory::InvalidParams => "Invalid method parameter(s).".to_string(),
        ErrorCategory::InternalError => "Internal JSON-RPC error.".to_string(),
        ErrorCategory::ServerError => echo("Server error", error),
        ErrorCategory::UnknownError => echo("Unknown error", error),
    };

    DecodedError {
        category,
        code: error.code,
        message,
    }
}

fn echo(prefix: &str, error: &JsonRpcErrorData) -> String {
    match &error.data {
        Some(data) => format!("{}: {} (data: {})", prefix, error.message, data),
        None => format!("{}: {}", prefix, error.message),
    }
}

/// Read an `error` member leniently
///
/// Objects with an integer `code` deserialize normally. Anything else becomes
/// an error object with code 0, so it decodes as `UnknownError` and keeps the
/// raw text as its message.
pub fn error_data_from_value(error: &Value) -> JsonRpcErrorData {
    serde_json::from_value::<JsonRpcErrorData>(error.clone()).unwrap_or_else(|_| {
        let data = error.get("data").cloned();
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        JsonRpcErrorData {
            code: 0,
            message,
            data,
        }
    })
}

/// Interpretation of a raw JSON-RPC response
///
/// A non-null `error` member wins even if the server also sent `result`.
/// The response `id` is not compared against the request id; it is exposed
/// through `id()` for callers that want to check it.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    /// The server returned a result
    Success {
        /// Value of the `result` member (`null` if the member was missing)
        result: Value,
        /// The full response
        response: Value,
    },
    /// The server returned an error object
    Failure {
        /// The decoded error
        error: DecodedError,
        /// The error object as sent
        raw: JsonRpcErrorData,
        /// The full response
        response: Value,
    },
}

impl CallOutcome {
    /// Split a response into success or failure
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jrpc_core::{CallOutcome, ErrorCategory};
    /// use serde_json::json;
    ///
    /// let outcome = CallOutcome::from_response(json!({
    ///     "jsonrpc": "2.0",
    ///     "error": {"code": -32601, "message": "Method not found"},
    ///     "id": 1
    /// }));
    /// assert_eq!(outcome.decoded_error().unwrap().category, ErrorCategory::MethodNotFound);
    /// ```
    pub fn from_response(response: Value) -> Self {
        match response.get("error") {
            Some(error) if !error.is_null() => {
                let raw = error_data_from_value(error);
                CallOutcome::Failure {
                    error: decode(&raw),
                    raw,
                    response,
                }
            }
            _ => CallOutcome::Success {
                result: response.get("result").cloned().unwrap_or(Value::Null),
                response,
            },
        }
    }

    /// Whether the server reported an error
    pub fn is_error(&self) -> bool {
        matches!(self, CallOutcome::Failure { .. })
    }

    /// The decoded error, if any
    pub fn decoded_error(&self) -> Option<&DecodedError> {
        match self {
            CallOutcome::Failure { error, .. } => Some(error),
            CallOutcome::Success { .. } => None,
        }
    }

    /// The original response
    pub fn response(&self) -> &Value {
        match self {
            CallOutcome::Success { response, .. } | CallOutcome::Failure { response, .. } => {
                response
            }
        }
    }

    /// The response `id`, if the server sent a usable one
    pub fn id(&self) -> Option<Id> {
        Id::from_response(self.response())
    }

    /// Turn the outcome into a `Result`, mapping a failure to `Error::JsonRpc`
    pub fn into_result(self) -> Result<Value> {
        match self {
            CallOutcome::Success { result, .. } => Ok(result),
            CallOutcome::Failure { raw, .. } => Err(Error::JsonRpc(raw)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn category(code: i64) -> ErrorCategory {
        decode(&JsonRpcErrorData::new(code, "msg")).category
    }

    #[test]
    fn test_exact_codes() {
        assert_eq!(category(-32700), ErrorCategory::ParseError);
        assert_eq!(category(-32600), ErrorCategory::InvalidRequest);
        assert_eq!(category(-32601), ErrorCategory::MethodNotFound);
        assert_eq!(category(-32602), ErrorCategory::InvalidParams);
        assert_eq!(category(-32603), ErrorCategory::InternalError);
    }

    #[test]
    fn test_server_range_boundaries() {
        assert_eq!(category(-32000), ErrorCategory::ServerError);
        assert_eq!(category(-32099), ErrorCategory::ServerError);
        assert_eq!(category(-32050), ErrorCategory::ServerError);
        assert_eq!(category(-31999), ErrorCategory::UnknownError);
        assert_eq!(category(-32100), ErrorCategory::UnknownError);
    }

    #[test]
    fn test_other_codes_are_unknown() {
        for code in [-1, 0, 1, 404, -32604, -32768, i64::MIN, i64::MAX] {
            assert_eq!(category(code), ErrorCategory::UnknownError, "code {}", code);
        }
    }

    #[test]
    fn test_parse_error_message() {
        let decoded = decode(&JsonRpcErrorData::new(-32700, "whatever the server said"));
        assert_eq!(decoded.message, "Invalid JSON was received by the server.");
        assert_eq!(decoded.code, -32700);
    }

    #[test]
    fn test_server_error_echoes_message_and_data() {
        let decoded = decode(&JsonRpcErrorData::with_data(
            -32050,
            "Database unavailable",
            json!({"retry_after": 5}),
        ));
        assert_eq!(decoded.category, ErrorCategory::ServerError);
        assert!(decoded.message.contains("Database unavailable"));
        assert!(decoded.message.contains("retry_after"));
    }

    #[test]
    fn test_unknown_error_echoes_message() {
        let decoded = decode(&JsonRpcErrorData::new(-1, "custom failure"));
        assert_eq!(decoded.message, "Unknown error: custom failure");
        assert_eq!(decoded.to_string(), "[UnknownError] Unknown error: custom failure");
    }

    #[test]
    fn test_outcome_success() {
        let outcome = CallOutcome::from_response(json!({"jsonrpc": "2.0", "result": "success", "id": 1}));
        assert!(!outcome.is_error());
        assert_eq!(outcome.id(), Some(Id::Number(1)));
        assert_eq!(outcome.into_result().unwrap(), json!("success"));
    }

    #[test]
    fn test_outcome_error_is_authoritative() {
        let response = json!({
            "jsonrpc": "2.0",
            "result": "ignored",
            "error": {"code": -32602, "message": "Invalid params"},
            "id": 3
        });
        let outcome = CallOutcome::from_response(response.clone());

        assert!(outcome.is_error());
        assert_eq!(outcome.decoded_error().unwrap().category, ErrorCategory::InvalidParams);
        assert_eq!(outcome.response(), &response);

        match outcome.into_result() {
            Err(Error::JsonRpc(raw)) => assert_eq!(raw.code, -32602),
            other => panic!("Expected JsonRpc error, got {:?}", other),
        }
    }

    #[test]
    fn test_outcome_null_error_is_success() {
        let outcome = CallOutcome::from_response(json!({"jsonrpc": "2.0", "result": 5, "error": null, "id": 1}));
        assert!(!outcome.is_error());
    }

    #[test]
    fn test_outcome_malformed_error_member() {
        let outcome = CallOutcome::from_response(json!({"jsonrpc": "2.0", "error": "boom", "id": null}));
        let decoded = outcome.decoded_error().unwrap();
        assert_eq!(decoded.category, ErrorCategory::UnknownError);
        assert!(decoded.message.contains("boom"));
        assert_eq!(outcome.id(), Some(Id::Null));

        let outcome = CallOutcome::from_response(json!({"error": {"code": "x", "message": "bad code"}}));
        assert_eq!(outcome.decoded_error().unwrap().category, ErrorCategory::UnknownError);
    }

    #[test]
    fn test_outcome_missing_result_is_null() {
        let outcome = CallOutcome::from_response(json!({"jsonrpc": "2.0", "id": 1}));
        assert_eq!(outcome.into_result().unwrap(), Value::Null);
    }
}
