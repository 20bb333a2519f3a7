//! Client certificate material for mutual TLS
//!
//! Credentials are held as PEM text, never as file paths. A transport turns
//! them into an in-memory TLS identity for the duration of one call; nothing is
//! written to disk. Both the PEM strings and the combined buffer built from
//! them are wiped from memory when dropped.

use jrpc_core::{Error, Result};
use serde::Deserialize;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// PEM-encoded client certificate and private key
///
/// Typically loaded from a secrets store or configuration file, hence the
/// `Deserialize` impl. `Debug` output never includes the PEM text.
///
/// # Examples
///
/// ```rust
/// use jrpc_client::ClientCredentials;
///
/// let credentials = ClientCredentials::new("-----BEGIN CERTIFICATE-----...", "");
/// assert!(!credentials.is_complete());
/// assert!(!format!("{:?}", credentials).contains("BEGIN"));
/// ```
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct ClientCredentials {
    certificate_pem: String,
    key_pem: String,
}

impl ClientCredentials {
    /// Wrap certificate and key PEM text
    pub fn new(certificate_pem: impl Into<String>, key_pem: impl Into<String>) -> Self {
        Self {
            certificate_pem: certificate_pem.into(),
            key_pem: key_pem.into(),
        }
    }

    /// Both the certificate and the key are present
    ///
    /// Incomplete credentials are ignored by transports.
    pub fn is_complete(&self) -> bool {
        !self.certificate_pem.trim().is_empty() && !self.key_pem.trim().is_empty()
    }

    /// Build an in-memory TLS identity from the PEM material
    ///
    /// The concatenated PEM buffer only lives inside this function and is
    /// zeroed before it returns, on success and on failure.
    pub(crate) fn to_identity(&self) -> Result<reqwest::Identity> {
        let mut pem = Zeroizing::new(Vec::with_capacity(
            self.certificate_pem.len() + self.key_pem.len() + 1,
        ));
        pem.extend_from_slice(self.certificate_pem.as_bytes());
        pem.push(b'\n');
        pem.extend_from_slice(self.key_pem.as_bytes());

        reqwest::Identity::from_pem(&pem)
            .map_err(|e| Error::Tls(format!("invalid client certificate or key: {}", e)))
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("certificate_pem", &"<redacted>")
            .field("key_pem", &"<redacted>")
            .finish()
    }
}
