//! Call metrics
//!
//! OpenTelemetry instruments recorded by `JrpcServer` when metrics are
//! enabled:
//!
//! - **jrpc.client.calls.total**: calls attempted, by method and status (counter)
//! - **jrpc.client.call.duration**: call latency in seconds (histogram)
//! - **jrpc.client.errors.total**: local failures, by `Error::kind()` (counter)
//! - **jrpc.client.protocol_errors.total**: decoded server errors, by category (counter)
//!
//! Instruments come from the global meter provider, so they are no-ops until
//! the host installs one (for example via `jrpc_core::init_observability`).

use jrpc_core::ErrorCategory;
use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
    InstrumentationScope, KeyValue,
};

/// Client-side call metrics
pub struct CallMetrics {
    /// Total number of calls
    pub calls_total: Counter<u64>,
    /// Call duration in seconds
    pub call_duration: Histogram<f64>,
    /// Total number of local errors
    pub errors_total: Counter<u64>,
    /// Total number of decoded JSON-RPC errors
    pub protocol_errors_total: Counter<u64>,
}

impl CallMetrics {
    /// Create metrics from the global meter provider
    pub fn new(service_name: impl Into<String>) -> Self {
        let scope = InstrumentationScope::builder(service_name.into()).build();
        let meter = global::meter_with_scope(scope);
        Self::new_with_meter(&meter)
    }

    /// Create metrics from a specific meter
    pub fn new_with_meter(meter: &Meter) -> Self {
        Self {
            calls_total: meter
                .u64_counter("jrpc.client.calls.total")
                .with_description("Total number of JSON-RPC calls")
                .build(),
            call_duration: meter
                .f64_histogram("jrpc.client.call.duration")
                .with_description("JSON-RPC call duration in seconds")
                .build(),
            errors_total: meter
                .u64_counter("jrpc.client.errors.total")
                .with_description("Total number of calls that failed locally")
                .build(),
            protocol_errors_total: meter
                .u64_counter("jrpc.client.protocol_errors.total")
                .with_description("Total number of JSON-RPC error responses")
                .build(),
        }
    }

    /// Record a finished call
    pub fn record_call(&self, method: &str, transport: &str, status: &str, duration_secs: f64) {
        let attributes = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("transport", transport.to_string()),
            KeyValue::new("status", status.to_string()),
        ];
        self.calls_total.add(1, attributes);
        self.call_duration.record(duration_secs, attributes);
    }

    /// Record a local failure
    pub fn record_error(&self, error_kind: &str) {
        let attributes = &[KeyValue::new("error_kind", error_kind.to_string())];
        self.errors_total.add(1, attributes);
    }

    /// Record a decoded JSON-RPC error response
    pub fn record_protocol_error(&self, method: &str, category: ErrorCategory) {
        let attributes = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("category", category.as_str()),
        ];
        self.protocol_errors_total.add(1, attributes);
    }
}

impl std::fmt::Debug for CallMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallMetrics").finish_non_exhaustive()
    }
}
