//! Parsing of call input handed over by a hosting application
//!
//! Front-ends usually collect a method name and a params text box. `CallInput`
//! applies the same limits as the original form (method up to 100 characters,
//! params text up to 1000) and turns the params text into a JSON value whose
//! shape has been re-checked.

use crate::codec;
use crate::error::{Error, Result};
use serde_json::Value;

/// Maximum length of a method name, in characters
pub const MAX_METHOD_LEN: usize = 100;

/// Maximum length of the params text, in characters
pub const MAX_PARAMS_LEN: usize = 1000;

/// A validated `(method, params)` pair ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct CallInput {
    /// Method name, trimmed and non-empty
    pub method: String,
    /// Parsed params; `None` when the text was empty
    pub params: Option<Value>,
}

impl CallInput {
    /// Validate a method name and a params text
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jrpc_core::CallInput;
    /// use serde_json::json;
    ///
    /// let input = CallInput::parse("add", r#"{"a": 1, "b": 2}"#).unwrap();
    /// assert_eq!(input.params, Some(json!({"a": 1, "b": 2})));
    ///
    /// assert!(CallInput::parse("add", "").unwrap().params.is_none());
    /// assert!(CallInput::parse("", "{}").is_err());
    /// ```
    pub fn parse(method: &str, params_text: &str) -> Result<Self> {
        let method = method.trim();
        if method.is_empty() {
            return Err(Error::InvalidInput("method must not be empty".to_string()));
        }
        if method.chars().count() > MAX_METHOD_LEN {
            return Err(Error::InvalidInput(format!(
                "method must be at most {} characters",
                MAX_METHOD_LEN
            )));
        }
        if params_text.chars().count() > MAX_PARAMS_LEN {
            return Err(Error::InvalidInput(format!(
                "params must be at most {} characters",
                MAX_PARAMS_LEN
            )));
        }

        Ok(Self {
            method: method.to_string(),
            params: parse_params_text(params_text)?,
        })
    }
}

/// Parse a params text into a JSON value
///
/// Blank text means no params. Text that is not JSON is `Error::InvalidInput`;
/// JSON that is not an object, array or `null` is `Error::InvalidParams`.
pub fn parse_params_text(text: &str) -> Result<Option<Value>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::InvalidInput(format!("params are not valid JSON: {}", e)))?;
    if value.is_null() {
        return Ok(None);
    }
    codec::normalize_params(Some(value.clone()))?;
    Ok(Some(value))
}
