//! Builder for `JrpcServer` handles
//!
//! The builder collects the server configuration: URL, protocol version,
//! transport, client credentials and telemetry. `build()` parses the URL and
//! validates the version, so a bad configuration fails here rather than on
//! the first call.
//!
//! # Examples
//!
//! ```rust,no_run
//! use jrpc_client::{HttpTransport, HttpTransportConfig, ServerBuilder};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> jrpc_core::Result<()> {
//! let transport = Arc::new(HttpTransport::with_config(
//!     HttpTransportConfig::default().with_timeout(Duration::from_secs(15)),
//! ));
//!
//! let server = ServerBuilder::new("https://rpc.example.com/api")
//!     .version("2.0")
//!     .transport(transport)
//!     .credentials_pem(
//!         std::fs::read_to_string("client.crt")?,
//!         std::fs::read_to_string("client.key")?,
//!     )
//!     .with_metrics("billing-gateway")
//!     .build()?;
//!
//! let outcome = server.call_and_decode("status", None).await?;
//! # Ok(())
//! # }
//! ```

use jrpc_core::{Error, ProtocolVersion, Result};
use std::sync::Arc;

use crate::credentials::ClientCredentials;
use crate::endpoint::Endpoint;
use crate::metrics::CallMetrics;
use crate::server::JrpcServer;
use crate::transport::{HttpTransport, Transport};

/// Builder for configuring and creating a `JrpcServer`
pub struct ServerBuilder {
    url: String,
    version: String,
    transport: Option<Arc<dyn Transport>>,
    credentials: Option<ClientCredentials>,
    metrics: Option<Arc<CallMetrics>>,
    observability_config: Option<jrpc_core::ObservabilityConfig>,
}

impl ServerBuilder {
    /// Create a builder for the given server URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            version: ProtocolVersion::default().to_string(),
            transport: None,
            credentials: None,
            metrics: None,
            observability_config: None,
        }
    }

    /// Set the protocol version (default `"2.0"`)
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Use a specific transport (default: a new `HttpTransport`)
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Present a client certificate on `https` calls
    pub fn credentials(mut self, credentials: ClientCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Present a client certificate given as PEM text
    pub fn credentials_pem(
        self,
        certificate_pem: impl Into<String>,
        key_pem: impl Into<String>,
    ) -> Self {
        self.credentials(ClientCredentials::new(certificate_pem, key_pem))
    }

    /// Record call metrics under the given meter name
    pub fn with_metrics(mut self, service_name: impl Into<String>) -> Self {
        self.metrics = Some(Arc::new(CallMetrics::new(service_name)));
        self
    }

    /// Record call metrics into an existing instrument set
    pub fn metrics(mut self, metrics: Arc<CallMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Install tracing and OpenTelemetry when the handle is built
    ///
    /// Only one handle per process should do this.
    pub fn with_observability(mut self, config: jrpc_core::ObservabilityConfig) -> Self {
        self.observability_config = Some(config);
        self
    }

    /// Validate the configuration and create the handle
    pub fn build(self) -> Result<JrpcServer> {
        let endpoint = Endpoint::parse(&self.url)?;
        let version = ProtocolVersion::parse(&self.version)?;

        if let Some(config) = self.observability_config {
            let service_name = config.service_name.clone();
            jrpc_core::init_observability(config).map_err(|e| {
                Error::Internal(format!("Failed to initialize observability: {}", e))
            })?;
            tracing::info!(service_name = %service_name, "Observability enabled for JSON-RPC client");
        }

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(HttpTransport::new()));

        tracing::debug!(
            endpoint = %endpoint,
            version = %version,
            transport = transport.name(),
            "JSON-RPC server handle created"
        );

        Ok(JrpcServer {
            endpoint,
            version,
            transport,
            credentials: self.credentials,
            metrics: self.metrics,
        })
    }
}
