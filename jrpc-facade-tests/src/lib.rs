//! Handlers defined against the `jrpc` facade only
//!
//! This crate has no direct dependency on `jrpc-processor` or `jrpc-macros`,
//! so everything `#[jrpc::handler]` generates must resolve through `jrpc`.

use jrpc::core::{Error, Result};
use jrpc::processor::RegistryBuilder;
use jrpc::Processor;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

#[jrpc::handler]
pub async fn something(word: String) -> Result<String> {
    Ok(format!("{}, please", word))
}

/// Length of a half-open span
#[jrpc::handler]
pub async fn length(span: Span) -> Result<u32> {
    span.end
        .checked_sub(span.start)
        .ok_or_else(|| Error::InvalidParams("end before start".to_string()))
}

/// A processor serving every handler in this crate
pub fn processor() -> Processor {
    let registry = RegistryBuilder::new()
        .handler("something", something())
        .handler("length", length())
        .build();
    Processor::new(registry)
}
