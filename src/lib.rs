//! jrpc - transport-agnostic JSON-RPC 2.0 processing
//!
//! This is the convenience crate that re-exports the jrpc sub-crates. Use it
//! if you want a single dependency for building a processor.
//!
//! # Architecture
//!
//! - **jrpc-core**: envelope types, codec, error handling, observability
//! - **jrpc-processor**: method registry, request processor, batches, middleware
//! - **jrpc-macros**: the `#[handler]` attribute macro
//!
//! The processor has no transport of its own: read text from wherever
//! messages arrive, hand it to [`Processor::process_string`], and write back
//! whatever it returns (an empty string means there is nothing to send).
//!
//! # Quick Start
//!
//! ```rust
//! use jrpc::core::Result;
//! use jrpc::processor::RegistryBuilder;
//! use jrpc::Processor;
//!
//! #[jrpc::handler]
//! async fn something(word: String) -> Result<String> {
//!     Ok(format!("{}, please", word))
//! }
//!
//! # async fn example() {
//! let registry = RegistryBuilder::new()
//!     .handler("something", something())
//!     .build();
//! let processor = Processor::new(registry);
//!
//! let output = processor
//!     .process_string(r#"{"method":"something","id":"ID","params":"yes"}"#)
//!     .await;
//! assert_eq!(output, r#"{"id":"ID","jsonrpc":"2.0","result":"yes, please"}"#);
//! # }
//! ```

pub use jrpc_core as core;
pub use jrpc_macros as macros;
pub use jrpc_processor as processor;

pub use jrpc_macros::handler;
pub use jrpc_processor::{Processor, Reply};
