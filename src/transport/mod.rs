//! Transport layer for sending single HTTP requests.
//!
//! This module provides types and traits for:
//! - Describing HTTP requests ([`HttpRequest`])
//! - Handling buffered HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])

mod client;
mod error;
mod http;


pub use client::{ReqwestClient, USER_AGENT};
pub use error::HttpError;
pub use http::{HttpClient, HttpRequest, HttpResponse, USER_TOKEN_HEADER};
