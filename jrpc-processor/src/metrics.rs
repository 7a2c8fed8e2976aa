//! Processor metrics
//!
//! OpenTelemetry instruments recorded by the processor when metrics are
//! enabled on the builder. Nothing is exported unless a meter provider is
//! installed (see `jrpc_core::init_observability`).
//!
//! # Metrics Collected
//!
//! - **requests_total**: envelopes dispatched, by method and status (counter)
//! - **request_duration**: dispatch latency in seconds (histogram)
//! - **batch_size**: number of elements per batch (histogram)
//! - **errors_total**: error envelopes produced, by error code (counter)
//!
//! # Examples
//!
//! ```rust
//! use jrpc_processor::ProcessorMetrics;
//!
//! let metrics = ProcessorMetrics::new("my-service");
//! metrics.record_request("add", "success", 0.002);
//! metrics.record_error(-32601);
//! ```

use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
    InstrumentationScope, KeyValue,
};

/// Instruments for processor activity, all prefixed `jrpc.processor.*`
#[derive(Clone)]
pub struct ProcessorMetrics {
    /// Envelopes dispatched to a handler or rejected during dispatch
    pub requests_total: Counter<u64>,
    /// Dispatch duration in seconds
    pub request_duration: Histogram<f64>,
    /// Batch size distribution
    pub batch_size: Histogram<u64>,
    /// Error envelopes produced
    pub errors_total: Counter<u64>,
}

impl ProcessorMetrics {
    /// Create instruments on the global meter named after the service
    pub fn new(service_name: impl Into<String>) -> Self {
        let scope = InstrumentationScope::builder(service_name.into()).build();
        let meter = global::meter_with_scope(scope);
        Self::new_with_meter(&meter)
    }

    /// Create instruments on a specific meter
    pub fn new_with_meter(meter: &Meter) -> Self {
        Self {
            requests_total: meter
                .u64_counter("jrpc.processor.requests.total")
                .with_description("Total number of envelopes dispatched")
                .build(),
            request_duration: meter
                .f64_histogram("jrpc.processor.request.duration")
                .with_description("Dispatch duration in seconds")
                .with_unit("s")
                .build(),
            batch_size: meter
                .u64_histogram("jrpc.processor.batch.size")
                .with_description("Number of elements in batch inputs")
                .build(),
            errors_total: meter
                .u64_counter("jrpc.processor.errors.total")
                .with_description("Total number of error envelopes produced")
                .build(),
        }
    }

    /// Record a dispatched call
    pub fn record_request(&self, method: &str, status: &str, duration_secs: f64) {
        let attributes = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("status", status.to_string()),
        ];
        self.requests_total.add(1, attributes);
        self.request_duration.record(duration_secs, attributes);
    }

    /// Record a batch input
    pub fn record_batch(&self, size: u64, mode: &str) {
        self.batch_size
            .record(size, &[KeyValue::new("mode", mode.to_string())]);
    }

    /// Record an error envelope by its code
    pub fn record_error(&self, code: i32) {
        self.errors_total
            .add(1, &[KeyValue::new("code", i64::from(code))]);
    }
}

impl std::fmt::Debug for ProcessorMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorMetrics").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = ProcessorMetrics::new("test-processor");

        // Without a meter provider these are no-ops; they must not panic
        metrics.record_request("something", "success", 0.1);
        metrics.record_batch(10, "parallel");
        metrics.record_error(-32700);
    }

    #[test]
    fn test_metrics_with_meter() {
        let meter = global::meter("test-processor-meter");
        let metrics = ProcessorMetrics::new_with_meter(&meter);

        metrics.record_request("add", "success", 0.05);
        metrics.record_request("divide", "error", 0.01);
        metrics.record_error(-32602);
        metrics.record_error(-32603);
        metrics.record_batch(1, "sequential");
    }
}
