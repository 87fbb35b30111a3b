//! Request execution engine shared by every resource client.
//!
//! This module provides:
//! - The generic response envelope and its parser ([`Envelope`], [`ApiResult`])
//! - Retry policy configuration ([`RetryPolicy`])
//! - The retrying executor ([`Executor`])
//! - The crate error type ([`Error`])

mod engine;
mod envelope;
mod error;
mod retry;


pub use engine::{Executor, REJECTED_STATUS, RawResponse};
pub use envelope::{ApiResult, Envelope, parse_envelope};
pub use error::Error;
pub use retry::RetryPolicy;
