//! Builder for configuring a [`Processor`]
//!
//! The builder collects handlers, scopes, batch settings, middleware and
//! observability options, then validates them in [`ProcessorBuilder::build`].
//!
//! # Examples
//!
//! ```rust
//! use jrpc_processor::{from_fn, BatchMode, Processor, TracingMiddleware};
//!
//! # fn example() -> jrpc_core::Result<()> {
//! let processor = Processor::builder()
//!     .handler("ping", from_fn(|_| async {
//!         Ok(serde_json::json!({"pong": true}))
//!     }))
//!     .batch_mode(BatchMode::Parallel)
//!     .max_batch_size(100)
//!     .use_sync_middleware(TracingMiddleware::new())
//!     .build()?;
//!
//! assert!(processor.has_method("ping"));
//! # Ok(())
//! # }
//! ```

use crate::batch::{BatchMode, BatchProcessor};
use crate::handler::Handler;
use crate::metrics::ProcessorMetrics;
use crate::middleware::{Middleware, MiddlewareChain, SyncMiddleware};
use crate::processor::{validate_scope, Processor};
use crate::registry::MethodRegistry;
use jrpc_core::{Error, ObservabilityConfig, Result};
use std::collections::HashMap;
use std::sync::Arc;

const DEFAULT_SERVICE_NAME: &str = "jrpc";

/// Builder for a [`Processor`]
#[derive(Default)]
pub struct ProcessorBuilder {
    registry: MethodRegistry,
    scopes: HashMap<String, MethodRegistry>,
    batch_mode: BatchMode,
    max_batch_size: Option<usize>,
    middleware_chain: MiddlewareChain,
    observability_config: Option<ObservabilityConfig>,
    service_name: Option<String>,
    metrics: bool,
    instruments: Option<ProcessorMetrics>,
}

impl ProcessorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler in the default registry
    pub fn handler(mut self, method: impl Into<String>, handler: Box<dyn Handler>) -> Self {
        self.registry.register(method, handler);
        self
    }

    /// Set the default registry (replaces any previously registered handlers)
    pub fn registry(mut self, registry: MethodRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Mount a registry under a method scope
    pub fn scope(mut self, scope: impl Into<String>, registry: MethodRegistry) -> Self {
        self.scopes.insert(scope.into(), registry);
        self
    }

    /// Set the batch evaluation mode
    pub fn batch_mode(mut self, mode: BatchMode) -> Self {
        self.batch_mode = mode;
        self
    }

    /// Reject batches with more than `max_size` elements
    pub fn max_batch_size(mut self, max_size: usize) -> Self {
        self.max_batch_size = Some(max_size);
        self
    }

    /// Append an async middleware
    pub fn use_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware_chain.add(middleware);
        self
    }

    /// Append a sync middleware
    pub fn use_sync_middleware<T: SyncMiddleware + 'static>(mut self, middleware: T) -> Self {
        self.middleware_chain.add_sync(middleware);
        self
    }

    /// Record `ProcessorMetrics` on the global meter provider
    pub fn with_metrics(mut self) -> Self {
        self.metrics = true;
        self
    }

    /// Record metrics on the given instruments instead of the global meter
    pub fn metrics(mut self, metrics: ProcessorMetrics) -> Self {
        self.instruments = Some(metrics);
        self.metrics = true;
        self
    }

    /// Install tracing and OpenTelemetry at build time, and record metrics
    pub fn with_observability(mut self, config: ObservabilityConfig) -> Self {
        self.observability_config = Some(config);
        self.metrics = true;
        self
    }

    /// Like `with_observability` with `ObservabilityConfig::default()`
    pub fn with_default_observability(self) -> Self {
        self.with_observability(ObservabilityConfig::default())
    }

    /// Service name for metrics and observability
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Validate the configuration and build the processor
    ///
    /// # Errors
    ///
    /// - `max_batch_size(0)`
    /// - a scope name that is empty or starts or ends with `/`
    /// - observability that fails to initialize (e.g. a subscriber is
    ///   already installed)
    pub fn build(self) -> Result<Processor> {
        if self.max_batch_size == Some(0) {
            return Err(Error::Internal(
                "max_batch_size must be at least 1".to_string(),
            ));
        }

        for scope in self.scopes.keys() {
            validate_scope(scope)?;
        }

        let mut service_name = self.service_name;

        if let Some(mut config) = self.observability_config {
            if let Some(name) = &service_name {
                config.service_name = name.clone();
            }
            service_name.get_or_insert_with(|| config.service_name.clone());

            jrpc_core::init_observability(config).map_err(|e| {
                Error::Internal(format!("Failed to initialize observability: {}", e))
            })?;
        }

        let metrics = match self.instruments {
            Some(instruments) => Some(Arc::new(instruments)),
            None => self.metrics.then(|| {
                let name = service_name.as_deref().unwrap_or(DEFAULT_SERVICE_NAME);
                Arc::new(ProcessorMetrics::new(name))
            }),
        };

        tracing::debug!(
            methods = self.registry.len(),
            scopes = self.scopes.len(),
            batch_mode = self.batch_mode.as_str(),
            max_batch_size = ?self.max_batch_size,
            middleware = self.middleware_chain.len(),
            metrics = metrics.is_some(),
            "Processor built"
        );

        Ok(Processor::from_parts(
            self.registry,
            self.scopes,
            self.middleware_chain,
            BatchProcessor::with_limit(self.batch_mode, self.max_batch_size),
            metrics,
        ))
    }
}
