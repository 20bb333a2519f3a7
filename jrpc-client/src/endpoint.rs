//! Server address decomposition
//!
//! An `Endpoint` is the scheme, host, port and path of a JSON-RPC server URL,
//! parsed once when a `JrpcServer` is built. Whether the scheme is usable is
//! the transport's decision, not the parser's.

use jrpc_core::{Error, Result};
use std::fmt;
use url::{Host, Url};

/// Parsed server address
///
/// - `scheme` is lower-case
/// - `host` is bare (IPv6 addresses carry no brackets)
/// - `port` is `None` unless the URL spelled one out
/// - `path` excludes query and fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    scheme: String,
    host: String,
    port: Option<u16>,
    path: String,
}

impl Endpoint {
    /// Parse an absolute URL
    ///
    /// Fails with `Error::MalformedUrl` when the text is not an absolute URL
    /// or has no host.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jrpc_client::Endpoint;
    ///
    /// let endpoint = Endpoint::parse("HTTPS://rpc.example.com:8443/api").unwrap();
    /// assert_eq!(endpoint.scheme(), "https");
    /// assert_eq!(endpoint.host(), "rpc.example.com");
    /// assert_eq!(endpoint.port(), Some(8443));
    /// assert_eq!(endpoint.path(), "/api");
    ///
    /// assert_eq!(Endpoint::parse("http://localhost/").unwrap().port(), None);
    /// ```
    pub fn parse(url: &str) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedUrl {
            url: url.to_string(),
            reason,
        };

        let parsed = Url::parse(url.trim()).map_err(|e| malformed(e.to_string()))?;
        let host = match parsed.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_lowercase(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            _ => return Err(malformed("missing host".to_string())),
        };

        let port = parsed.port().or_else(|| explicit_default_port(&parsed, url));

        Ok(Self {
            scheme: parsed.scheme().to_lowercase(),
            host,
            port,
            path: parsed.path().to_string(),
        })
    }

    /// Lower-case URL scheme
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host name or address
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port, if the URL named one
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Request path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// `host[:port]`, with IPv6 hosts bracketed
    pub fn authority(&self) -> String {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        match self.port {
            Some(port) => format!("{}:{}", host, port),
            None => host,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority(), self.path)
    }
}

/// `url` normalizes `http://h:80` to no port; recover ports the text spelled out
fn explicit_default_port(parsed: &Url, original: &str) -> Option<u16> {
    let default = parsed.port_or_known_default()?;
    let after_scheme = original.trim().split_once("://")?.1;
    let authority = after_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    let port_text = match host_port.strip_prefix('[') {
        Some(bracketed) => bracketed.split_once(']')?.1.strip_prefix(':')?,
        None => host_port.rsplit_once(':')?.1,
    };

    (port_text.parse::<u16>().ok()? == default).then_some(default)
}
