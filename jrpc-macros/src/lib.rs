//! Procedural macros for the jrpc JSON-RPC processor
//!
//! ## `#[handler]`
//!
//! Turns an async function into a factory returning `Box<dyn Handler>`,
//! built with `jrpc::processor::from_typed_fn`. The factory still has to be
//! registered explicitly:
//!
//! ```ignore
//! use jrpc_core::Result;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct AddParams {
//!     a: i32,
//!     b: i32,
//! }
//!
//! #[jrpc::handler]
//! async fn add(params: AddParams) -> Result<i32> {
//!     Ok(params.a + params.b)
//! }
//!
//! let registry = RegistryBuilder::new().handler("add", add()).build();
//! ```
//!
//! The generated code refers to `::jrpc::processor`, so the calling crate
//! needs the `jrpc` facade among its dependencies. Depending on
//! `jrpc-processor` and `jrpc-macros` alone is not enough.

mod handler;

use proc_macro::TokenStream;
use syn::{parse_macro_input, ItemFn};

/// Define a JSON-RPC handler from an async function
///
/// The function may take zero or one parameter. The parameter type must
/// implement `serde::Deserialize`; absent params deserialize from `null`, so
/// a zero-parameter function accepts absent or `null` params. The return type
/// must be `jrpc_core::Result<T>` with `T: serde::Serialize`.
///
/// Params that fail to deserialize produce an invalid-params error
/// (`-32602`); any `Err` returned by the body other than
/// `Error::InvalidParams` becomes an internal error (`-32603`).
///
/// Visibility, doc comments and other attributes are kept on the generated
/// factory function.
#[proc_macro_attribute]
pub fn handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    handler::expand(attr.into(), input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
