//! Pixela API client
//!
//! An async client for the [Pixela](https://pixe.la) pixelation-graph
//! tracking service. Every endpoint goes through a shared executor that
//! retries calls the service rejects under load (HTTP 503 with
//! `isRejected: true`) using exponential backoff.

pub mod client;
pub mod context;
pub mod executor;
pub mod resource;
pub mod time;
pub mod transport;

#[cfg(test)]
mod test_fixtures;

pub use client::{API_BASE_URL, Pixela, PixelaBuilder};
pub use context::CallContext;
pub use executor::{ApiResult, Error, RetryPolicy};
