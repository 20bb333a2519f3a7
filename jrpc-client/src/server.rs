//! Handle for calling methods on one JSON-RPC server
//!
//! A `JrpcServer` binds a URL, a protocol version, a transport and optional
//! client credentials. The URL is parsed and the version validated when the
//! handle is built, so configuration mistakes surface before any call. After
//! that the handle is immutable: it can be cloned and reused for any number of
//! sequential or concurrent calls.

use jrpc_core::{CallInput, CallOutcome, ProtocolVersion, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::credentials::ClientCredentials;
use crate::endpoint::Endpoint;
use crate::metrics::CallMetrics;
use crate::server_builder::ServerBuilder;
use crate::transport::{Transport, TransportRequest};

/// Call id used when the caller does not pick one
pub const DEFAULT_CALL_ID: i64 = 1;

/// JSON-RPC server handle
#[derive(Clone)]
pub struct JrpcServer {
    pub(crate) endpoint: Endpoint,
    pub(crate) version: ProtocolVersion,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) credentials: Option<ClientCredentials>,
    pub(crate) metrics: Option<Arc<CallMetrics>>,
}

impl JrpcServer {
    /// Bind a server URL, protocol version and transport
    ///
    /// Fails with `Error::MalformedUrl` or `Error::UnsupportedVersion`.
    pub fn new(url: &str, version: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::builder(url).version(version).transport(transport).build()
    }

    /// Same as `new`, presenting a client certificate on `https` calls
    pub fn with_credentials(
        url: &str,
        version: &str,
        transport: Arc<dyn Transport>,
        credentials: ClientCredentials,
    ) -> Result<Self> {
        Self::builder(url)
            .version(version)
            .transport(transport)
            .credentials(credentials)
            .build()
    }

    /// Start configuring a server handle
    pub fn builder(url: impl Into<String>) -> ServerBuilder {
        ServerBuilder::new(url)
    }

    /// The parsed server address
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The validated protocol version
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Name of the configured transport
    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Call a method with the default call id
    pub async fn call_method(&self, method: &str, params: Option<Value>) -> Result<Value> {
        self.call_method_with_id(method, params, DEFAULT_CALL_ID).await
    }

    /// Call a method and return the raw response body
    ///
    /// A JSON-RPC `error` member in the response is not an `Err`; use
    /// `call_and_decode` or `CallOutcome` to interpret it.
    #[tracing::instrument(
        skip(self, method, params),
        fields(method = %method, endpoint = %self.endpoint, transport = self.transport.name())
    )]
    pub async fn call_method_with_id(
        &self,
        method: &str,
        params: Option<Value>,
        call_id: i64,
    ) -> Result<Value> {
        let start = Instant::now();
        let request = TransportRequest {
            endpoint: &self.endpoint,
            version: self.version,
            method,
            params,
            call_id,
            credentials: self.credentials.as_ref(),
        };

        let result = self.transport.call(request).await;
        let duration = start.elapsed().as_secs_f64();

        match &result {
            Ok(_) => {
                tracing::debug!(duration_secs = duration, "Call completed");
            }
            Err(error) => {
                tracing::warn!(error = %error, kind = error.kind(), "Call failed");
            }
        }

        if let Some(ref metrics) = self.metrics {
            let status = if result.is_ok() { "success" } else { "error" };
            metrics.record_call(method, self.transport.name(), status, duration);
            if let Err(ref error) = result {
                metrics.record_error(error.kind());
            }
        }

        result
    }

    /// Call a method and interpret the response
    ///
    /// Local failures are still `Err`; a JSON-RPC error object comes back as
    /// `Ok(CallOutcome::Failure { .. })` with the decoded category.
    pub async fn call_and_decode(&self, method: &str, params: Option<Value>) -> Result<CallOutcome> {
        let response = self.call_method(method, params).await?;
        let outcome = CallOutcome::from_response(response);

        if let Some(decoded) = outcome.decoded_error() {
            tracing::info!(
                method = %method,
                category = %decoded.category,
                code = decoded.code,
                response = %outcome.response(),
                "Server returned a JSON-RPC error"
            );
            if let Some(ref metrics) = self.metrics {
                metrics.record_protocol_error(method, decoded.category);
            }
        }

        Ok(outcome)
    }

    /// Call a method from validated front-end input
    pub async fn call_input(&self, input: &CallInput) -> Result<CallOutcome> {
        self.call_and_decode(&input.method, input.params.clone()).await
    }

    /// Parse raw front-end input and call it
    ///
    /// Input errors are returned before any transport work.
    pub async fn call_text(&self, method: &str, params_text: &str) -> Result<CallOutcome> {
        let input = CallInput::parse(method, params_text)?;
        self.call_input(&input).await
    }
}

impl std::fmt::Debug for JrpcServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JrpcServer")
            .field("endpoint", &self.endpoint)
            .field("version", &self.version)
            .field("transport", &self.transport.name())
            .field("credentials", &self.credentials)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
