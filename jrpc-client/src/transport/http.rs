//! HTTP/HTTPS transport for the JSON-RPC client
//!
//! Every call builds its own `reqwest::Client` with idle pooling disabled, so
//! one call opens exactly one connection and that connection is gone once the
//! call returns. For `https` the client validates the server against the
//! platform trust store (with the bundled web PKI roots as a fallback) plus any
//! extra roots from the config, and, when complete credentials are supplied,
//! presents an in-memory client identity.

use async_trait::async_trait;
use jrpc_core::{codec, Error, Result};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::credentials::ClientCredentials;
use crate::endpoint::Endpoint;
use crate::transport::{Transport, TransportRequest};

const SUPPORTED_SCHEMES: &[&str] = &["http", "https"];

/// Tunables for `HttpTransport`
///
/// With the defaults no total timeout is applied; the call lasts as long as
/// the underlying connect and read take.
#[derive(Debug, Clone, Default)]
pub struct HttpTransportConfig {
    /// Total time allowed for one call
    pub timeout: Option<Duration>,
    /// Time allowed for establishing the connection
    pub connect_timeout: Option<Duration>,
    /// Value of the `User-Agent` header
    pub user_agent: Option<String>,
    /// Extra PEM-encoded CA certificates trusted for server authentication
    pub root_certificates_pem: Vec<String>,
}

impl HttpTransportConfig {
    /// Set the total call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Trust an additional CA, e.g. the private CA of an mTLS deployment
    pub fn with_root_certificate_pem(mut self, pem: impl Into<String>) -> Self {
        self.root_certificates_pem.push(pem.into());
        self
    }
}

/// JSON-RPC over HTTP POST
///
/// Holds only configuration, so one instance can serve any number of
/// concurrent calls.
///
/// # Examples
///
/// ```rust,no_run
/// use jrpc_client::{HttpTransport, HttpTransportConfig, JrpcServer};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # async fn example() -> jrpc_core::Result<()> {
/// let transport = HttpTransport::with_config(
///     HttpTransportConfig::default().with_timeout(Duration::from_secs(10)),
/// );
/// let server = JrpcServer::new("https://rpc.example.com/api", "2.0", Arc::new(transport))?;
/// let response = server.call_method("status", None).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Create a transport with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with custom settings
    pub fn with_config(config: HttpTransportConfig) -> Self {
        Self { config }
    }

    /// The transport's settings
    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    fn validate_scheme(&self, scheme: &str) -> Result<()> {
        if self.schemes().contains(&scheme) {
            Ok(())
        } else {
            Err(Error::UnsupportedScheme(scheme.to_string()))
        }
    }

    /// Build the single-use client for one call
    fn build_client(
        &self,
        endpoint: &Endpoint,
        credentials: Option<&ClientCredentials>,
    ) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .no_proxy()
            .pool_max_idle_per_host(0);

        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(user_agent) = &self.config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        for pem in &self.config.root_certificates_pem {
            let certificates = reqwest::Certificate::from_pem_bundle(pem.as_bytes())
                .map_err(|e| Error::Tls(format!("invalid root certificate: {}", e)))?;
            if certificates.is_empty() {
                return Err(Error::Tls("no certificate found in root PEM".to_string()));
            }
            for certificate in certificates {
                builder = builder.add_root_certificate(certificate);
            }
        }

        match credentials {
            Some(credentials) if endpoint.scheme() == "https" && credentials.is_complete() => {
                debug!("Presenting client certificate");
                builder = builder.identity(credentials.to_identity()?);
            }
            Some(_) if endpoint.scheme() == "http" => {
                debug!("Ignoring client credentials for plain http");
            }
            _ => {}
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {}", e)))
    }

    fn request_url(endpoint: &Endpoint) -> String {
        let path = if endpoint.path().is_empty() {
            "/"
        } else {
            endpoint.path()
        };
        format!("{}://{}{}", endpoint.scheme(), endpoint.authority(), path)
    }
}

fn map_send_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout
    } else if err.is_connect() {
        Error::Connection(err.to_string())
    } else {
        Error::Http(err.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    fn schemes(&self) -> &'static [&'static str] {
        SUPPORTED_SCHEMES
    }

    async fn call(&self, request: TransportRequest<'_>) -> Result<Value> {
        let endpoint = request.endpoint;
        self.validate_scheme(endpoint.scheme())?;

        let payload = codec::build_request(
            request.version,
            request.method,
            request.params,
            request.call_id,
        )
        .and_then(|req| codec::encode_request(&req))?;

        // Dropped at the end of this call, taking the connection with it.
        let client = self.build_client(endpoint, request.credentials)?;
        let url = Self::request_url(endpoint);

        let start = Instant::now();
        let response = client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_send_error)?;

        debug!(
            url = %url,
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Received HTTP response"
        );

        codec::decode_response_body(&body).map_err(|e| match e {
            Error::ResponseDecode(reason) => {
                Error::ResponseDecode(format!("HTTP {}: {}", status.as_u16(), reason))
            }
            other => other,
        })
    }
}
