//! Protocol version validation
//!
//! Only JSON-RPC `"2.0"` is supported. Validation happens when a server handle
//! is constructed, so a misconfigured version is reported before any request is
//! attempted.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Protocol versions accepted by this crate
pub const SUPPORTED_VERSIONS: &[&str] = &["2.0"];

/// A JSON-RPC protocol version that passed validation
///
/// The only way to obtain one is through `ProtocolVersion::parse` (or
/// `FromStr`), so holding a value proves the version is supported.
///
/// # Examples
///
/// ```rust
/// use jrpc_core::ProtocolVersion;
///
/// let version = ProtocolVersion::parse("2.0").unwrap();
/// assert_eq!(version.as_str(), "2.0");
/// assert!(ProtocolVersion::parse("1.0").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProtocolVersion(&'static str);

impl ProtocolVersion {
    /// JSON-RPC 2.0
    pub const V2: ProtocolVersion = ProtocolVersion("2.0");

    /// Validate a version string
    ///
    /// Fails with `Error::UnsupportedVersion` carrying the rejected value.
    pub fn parse(version: &str) -> Result<Self> {
        SUPPORTED_VERSIONS
            .iter()
            .copied()
            .find(|supported| *supported == version)
            .map(ProtocolVersion)
            .ok_or_else(|| Error::UnsupportedVersion(version.to_string()))
    }

    /// The version string as sent in the `jsonrpc` member
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::V2
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for ProtocolVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Identity for supported versions, error for anything else
pub fn validate(version: &str) -> Result<&str> {
    ProtocolVersion::parse(version).map(|_| version)
}
