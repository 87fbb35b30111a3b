//! The generic `{message, isSuccess, isRejected}` response envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::Error;

/// The response envelope as it appears on the wire.
///
/// Unknown fields are ignored and missing fields take their zero value, so
/// resource-specific responses carrying extra fields still decode.
/// `is_success` stays `None` when the service omits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Envelope {
    /// Human-readable message, empty on most successful reads.
    pub message: String,
    /// Success flag, when the service sends one.
    pub is_success: Option<bool>,
    /// True when the service refused the call under load.
    pub is_rejected: bool,
}

/// Decodes raw bytes as an [`Envelope`].
///
/// # Errors
///
/// Returns [`Error::Decode`] if the bytes are not a JSON object.
pub fn parse_envelope(body: &[u8]) -> Result<Envelope, Error> {
    decode_json(body)
}

pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|source| Error::decode(body, source))
}

/// Outcome of an API call that answered with an envelope.
///
/// `status_code` is attached from the transport; it is not part of the
/// JSON payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResult {
    /// Message from the envelope.
    pub message: String,
    /// Whether the service reported success.
    pub is_success: bool,
    /// Whether the service rejected the call under load.
    pub is_rejected: bool,
    /// HTTP status of the final response.
    pub status_code: u16,
}

impl ApiResult {
    /// Builds the result of a write endpoint.
    ///
    /// `is_success` is taken literally and is `false` when absent.
    #[must_use]
    pub fn from_envelope(envelope: Envelope, status: http::StatusCode) -> Self {
        Self {
            is_success: envelope.is_success.unwrap_or(false),
            message: envelope.message,
            is_rejected: envelope.is_rejected,
            status_code: status.as_u16(),
        }
    }

    /// Builds the result attached to a typed read response.
    ///
    /// Read endpoints omit `isSuccess` on success and only send a message
    /// when something went wrong, so an absent flag is derived from an
    /// empty message.
    #[must_use]
    pub fn from_typed(envelope: Envelope, status: http::StatusCode) -> Self {
        let derived = envelope.message.is_empty();
        Self {
            is_success: envelope.is_success.unwrap_or(derived),
            message: envelope.message,
            is_rejected: envelope.is_rejected,
            status_code: status.as_u16(),
        }
    }

    /// Returns the HTTP status as a [`http::StatusCode`].
    #[must_use]
    pub fn status(&self) -> Option<http::StatusCode> {
        http::StatusCode::from_u16(self.status_code).ok()
    }

    /// Converts a result reporting failure into [`Error::Service`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Service`] when `is_success` is false.
    pub fn error_for_status(self) -> Result<Self, Error> {
        if self.is_success {
            return Ok(self);
        }
        Err(Error::Service {
            status: self
                .status()
                .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR),
            message: self.message,
        })
    }
}

/// A typed body decoded together with its envelope fields.
#[derive(Debug, Deserialize)]
pub(crate) struct Typed<T> {
    #[serde(flatten)]
    pub body: T,
    #[serde(flatten)]
    pub envelope: Envelope,
}
