//! Method registry: name → handler lookup
//!
//! The registry is populated explicitly at startup and only read while
//! requests are processed. Lookups clone an `Arc`, so a registry can be
//! shared by many concurrent callers without locking.
//!
//! # Examples
//!
//! ```rust
//! use jrpc_processor::{MethodRegistry, from_fn};
//!
//! let mut registry = MethodRegistry::new();
//! registry.register("ping", from_fn(|_| async {
//!     Ok(serde_json::json!({"pong": true}))
//! }));
//!
//! assert!(registry.has_method("ping"));
//! assert!(registry.get("pong").is_none());
//! ```

use crate::handler::Handler;
use std::collections::HashMap;
use std::sync::Arc;

/// Map of method names to handlers
///
/// Cloning is cheap: clones share the map until one of them registers a new
/// method (copy-on-write via `Arc::make_mut`).
#[derive(Clone, Default)]
pub struct MethodRegistry {
    handlers: Arc<HashMap<String, Arc<dyn Handler>>>,
}

impl MethodRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous handler of the same name
    pub fn register(&mut self, method: impl Into<String>, handler: Box<dyn Handler>) {
        let handlers = Arc::make_mut(&mut self.handlers);
        handlers.insert(method.into(), Arc::from(handler));
    }

    /// Look up the handler for a method
    pub fn get(&self, method: &str) -> Option<Arc<dyn Handler>> {
        self.handlers.get(method).cloned()
    }

    /// Check if a method is registered
    pub fn has_method(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Registered method names, sorted
    pub fn methods(&self) -> Vec<String> {
        let mut methods: Vec<String> = self.handlers.keys().cloned().collect();
        methods.sort();
        methods
    }

    /// Number of registered methods
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True if no method is registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("methods", &self.methods())
            .finish()
    }
}

/// Fluent builder for a [`MethodRegistry`]
#[derive(Default)]
pub struct RegistryBuilder {
    registry: MethodRegistry,
}

impl RegistryBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler for a method
    pub fn handler(mut self, method: impl Into<String>, handler: Box<dyn Handler>) -> Self {
        self.registry.register(method, handler);
        self
    }

    /// Finish building
    pub fn build(self) -> MethodRegistry {
        self.registry
    }
}
