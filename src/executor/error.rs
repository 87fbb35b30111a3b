//! Error type shared by every API call.

use thiserror::Error;

use crate::context::Interruption;
use crate::transport::HttpError;

/// Error returned by the executor and every resource client.
///
/// Each failure class is a separate variant so callers can decide to log,
/// alert, or propagate without inspecting messages. The library never logs
/// or swallows these itself.
#[derive(Debug, Error)]
pub enum Error {
    /// The network call itself failed. Never retried.
    #[error("failed http call: {0}")]
    Transport(#[from] HttpError),

    /// The response body is not the expected JSON shape.
    ///
    /// `body` holds the raw response text.
    #[error("failed to unmarshal json: {body}")]
    Decode {
        /// Raw response text that failed to decode.
        body: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be serialized.
    #[error("failed to marshal json: {0}")]
    Encode(#[source] serde_json::Error),

    /// The service answered with an envelope reporting failure.
    ///
    /// Only produced by [`ApiResult::error_for_status`](super::ApiResult::error_for_status).
    #[error("API call failed with status {status}: {message}")]
    Service {
        /// HTTP status of the response.
        status: http::StatusCode,
        /// Message from the envelope.
        message: String,
    },

    /// A strict call received a status of 300 or above.
    #[error("failed to call API: {body}")]
    Status {
        /// HTTP status of the response.
        status: http::StatusCode,
        /// Raw response text.
        body: String,
    },

    /// The service kept rejecting the call until the retry limit was hit.
    #[error("api call rejected after {attempts} attempt(s)")]
    Rejected {
        /// Number of requests sent.
        attempts: u32,
    },

    /// The call's cancellation token fired.
    #[error("api call cancelled")]
    Cancelled,

    /// The call's deadline passed.
    #[error("api call deadline exceeded")]
    DeadlineExceeded,

    /// A channel definition carried a type this client does not know.
    #[error("unsupported channel type: {0}")]
    UnsupportedChannelType(String),

    /// The configured base URL cannot carry API paths.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The configured token cannot be sent as a header value.
    #[error("invalid user token: {0}")]
    InvalidToken(#[from] http::header::InvalidHeaderValue),
}

impl Error {
    /// Returns the HTTP status attached to this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<http::StatusCode> {
        match self {
            Self::Service { status, .. } | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Builds a [`Error::Decode`] from the raw body that failed to parse.
    pub(crate) fn decode(body: &[u8], source: serde_json::Error) -> Self {
        Self::Decode {
            body: String::from_utf8_lossy(body).into_owned(),
            source,
        }
    }
}

impl From<Interruption> for Error {
    fn from(interruption: Interruption) -> Self {
        match interruption {
            Interruption::Cancelled => Self::Cancelled,
            Interruption::DeadlineExceeded => Self::DeadlineExceeded,
        }
    }
}
