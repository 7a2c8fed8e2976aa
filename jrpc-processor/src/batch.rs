//! Batch evaluation
//!
//! A batch is a top-level array of envelopes. Each element is processed on
//! its own and the outputs are collected in input order, with elements that
//! produce no output (successful notifications) left out.
//!
//! # Batch Modes
//!
//! - **Sequential**: evaluate elements one after another (default)
//! - **Parallel**: poll every element's future concurrently on the calling
//!   task; output order still equals input order
//!
//! # Size Limiting
//!
//! An optional maximum batch size rejects oversized batches as a whole before
//! any element is evaluated.
//!
//! # Examples
//!
//! ```rust
//! use jrpc_processor::{BatchMode, BatchProcessor};
//!
//! let parallel = BatchProcessor::with_limit(BatchMode::Parallel, Some(100));
//! let sequential = BatchProcessor::new(BatchMode::Sequential);
//! assert!(parallel.check_size(101).is_err());
//! assert!(sequential.check_size(10_000).is_ok());
//! ```

use futures::future::join_all;
use jrpc_core::{Error, JsonRpcResponse, Result};
use serde_json::Value;
use std::future::Future;

/// How batch elements are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    /// Poll all element futures concurrently
    ///
    /// Handlers of one batch may interleave; use only when elements do not
    /// depend on each other.
    Parallel,

    /// Evaluate elements strictly in order
    #[default]
    Sequential,
}

impl BatchMode {
    /// Short name used in logs and metric attributes
    pub fn as_str(self) -> &'static str {
        match self {
            BatchMode::Parallel => "parallel",
            BatchMode::Sequential => "sequential",
        }
    }
}

/// Evaluates batch elements according to a [`BatchMode`]
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchProcessor {
    mode: BatchMode,
    max_size: Option<usize>,
}

impl BatchProcessor {
    /// Create a batch processor without a size limit
    pub fn new(mode: BatchMode) -> Self {
        Self { mode, max_size: None }
    }

    /// Create a batch processor with an optional size limit
    pub fn with_limit(mode: BatchMode, max_size: Option<usize>) -> Self {
        Self { mode, max_size }
    }

    /// Configured mode
    pub fn mode(&self) -> BatchMode {
        self.mode
    }

    /// Configured size limit
    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }

    /// Reject a batch of `len` elements if it exceeds the limit
    ///
    /// # Errors
    ///
    /// Returns `Error::BatchSizeExceeded` when a limit is set and `len` is
    /// above it.
    pub fn check_size(&self, len: usize) -> Result<()> {
        match self.max_size {
            Some(limit) if len > limit => {
                tracing::warn!(batch_size = len, max_size = limit, "Batch size exceeded");
                Err(Error::BatchSizeExceeded { limit, actual: len })
            }
            _ => Ok(()),
        }
    }

    /// Evaluate `elements` with `process`, keeping input order
    ///
    /// `process` returns `None` for elements that produce no output.
    #[tracing::instrument(skip(self, elements, process), fields(batch_size = elements.len(), mode = self.mode.as_str()))]
    pub async fn process<F, Fut>(&self, elements: Vec<Value>, process: F) -> Vec<JsonRpcResponse>
    where
        F: Fn(Value) -> Fut,
        Fut: Future<Output = Option<JsonRpcResponse>>,
    {
        let responses: Vec<JsonRpcResponse> = match self.mode {
            BatchMode::Parallel => join_all(elements.into_iter().map(&process))
                .await
                .into_iter()
                .flatten()
                .collect(),
            BatchMode::Sequential => {
                let mut responses = Vec::with_capacity(elements.len());
                for element in elements {
                    if let Some(response) = process(element).await {
                        responses.push(response);
                    }
                }
                responses
            }
        };

        tracing::debug!(response_count = responses.len(), "Batch processing completed");
        responses
    }
}
