//! Request execution with rejection-aware retries.

use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use super::envelope::{Typed, decode_json, parse_envelope};
use super::{ApiResult, Error, RetryPolicy};
use crate::context::CallContext;
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{HttpClient, HttpRequest, HttpResponse};

/// Status the service uses to signal a voluntary, retryable rejection.
pub const REJECTED_STATUS: http::StatusCode = http::StatusCode::SERVICE_UNAVAILABLE;

/// Final status and body of a call, before any JSON decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status of the final response.
    pub status: http::StatusCode,
    /// Fully buffered response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Decodes the body as `T` plus the envelope fields found alongside it.
    ///
    /// The attached [`ApiResult`] follows the read-endpoint rule: an absent
    /// `isSuccess` is derived from an empty message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the body does not fit `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<(T, ApiResult), Error> {
        let typed: Typed<T> = decode_json(&self.body)?;
        Ok((typed.body, ApiResult::from_typed(typed.envelope, self.status)))
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl From<HttpResponse> for RawResponse {
    fn from(response: HttpResponse) -> Self {
        Self {
            status: response.status,
            body: response.body,
        }
    }
}

/// Shared execution engine used by every resource client.
///
/// Wraps an [`HttpClient`] with the JSON content type, the retry loop for
/// rejected calls, and envelope parsing. Each call owns its own retry
/// state; the executor itself is read-only and can be shared freely.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper used for backoff (defaults to [`TokioSleeper`])
#[derive(Debug, Clone)]
pub struct Executor<H, S = TokioSleeper> {
    client: H,
    sleeper: S,
    policy: RetryPolicy,
}

impl<H> Executor<H, TokioSleeper> {
    /// Creates an executor with the default retry policy and tokio timer.
    #[must_use]
    pub fn new(client: H) -> Self {
        Self {
            client,
            sleeper: TokioSleeper,
            policy: RetryPolicy::default(),
        }
    }
}

impl<H, S> Executor<H, S> {
    /// Sets a custom sleeper for backoff delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> Executor<H, S2> {
        Executor {
            client: self.client,
            sleeper,
            policy: self.policy,
        }
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &H {
        &self.client
    }
}

impl<H: HttpClient, S: Sleeper> Executor<H, S> {
    /// Runs the request through the retry loop and parses the envelope.
    ///
    /// A non-2xx status with a valid envelope is not an error here; check
    /// [`ApiResult::is_success`] or use [`ApiResult::error_for_status`].
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] if the network call fails
    /// - [`Error::Decode`] if the body is not an envelope
    /// - [`Error::Rejected`] if every attempt was rejected
    /// - [`Error::Cancelled`] / [`Error::DeadlineExceeded`] from `ctx`
    pub async fn execute_and_parse(
        &self,
        ctx: &CallContext,
        request: &HttpRequest,
    ) -> Result<ApiResult, Error> {
        let raw = self.execute_with_retry(ctx, request).await?;
        let envelope = parse_envelope(&raw.body)?;
        Ok(ApiResult::from_envelope(envelope, raw.status))
    }

    /// Runs the request through the retry loop and returns the raw body.
    ///
    /// For callers that decode a resource-specific shape.
    ///
    /// # Errors
    ///
    /// Same as [`Executor::execute_and_parse`], except that bodies are only
    /// decoded for 503 responses.
    pub async fn execute_raw(
        &self,
        ctx: &CallContext,
        request: &HttpRequest,
    ) -> Result<RawResponse, Error> {
        self.execute_with_retry(ctx, request).await
    }

    /// Sends the request once and fails on any status of 300 or above.
    ///
    /// For responses without the envelope, such as SVG documents.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] if the network call fails
    /// - [`Error::Status`] carrying the body text for status >= 300
    /// - [`Error::Cancelled`] / [`Error::DeadlineExceeded`] from `ctx`
    pub async fn execute_strict(
        &self,
        ctx: &CallContext,
        request: &HttpRequest,
    ) -> Result<Vec<u8>, Error> {
        let response = self.send_once(ctx, request).await?;
        if response.status.as_u16() >= 300 {
            return Err(Error::Status {
                status: response.status,
                body: response.body_text(),
            });
        }
        Ok(response.body)
    }

    /// The retry loop.
    ///
    /// Only a 503 whose envelope says `isRejected: true` is retried. A 503
    /// whose body is not an envelope fails with [`Error::Decode`] at once.
    async fn execute_with_retry(
        &self,
        ctx: &CallContext,
        request: &HttpRequest,
    ) -> Result<RawResponse, Error> {
        let max_attempts = self.policy.max_attempts();

        for attempt in 0..max_attempts {
            debug!(
                method = %request.method,
                url = %request.url,
                attempt,
                max_attempts,
                "Sending request"
            );

            let response = self.send_once(ctx, request).await?;
            if !is_rejection(&response)? {
                return Ok(response.into());
            }

            if self.policy.should_retry(attempt) {
                let delay = self.policy.delay_for_retry(attempt);
                debug!(
                    url = %request.url,
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "Request rejected, backing off"
                );
                ctx.guard(self.sleeper.sleep(delay)).await?;
            }
        }

        Err(Error::Rejected {
            attempts: max_attempts,
        })
    }

    /// Sends one request with `Content-Type: application/json` set.
    async fn send_once(
        &self,
        ctx: &CallContext,
        request: &HttpRequest,
    ) -> Result<HttpResponse, Error> {
        let mut outgoing = request.clone();
        outgoing.headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        trace!(url = %outgoing.url, body_len = outgoing.body.len(), "Request body");

        let response = ctx.guard(self.client.request(outgoing)).await??;
        debug!(status = response.status.as_u16(), "Received response");
        Ok(response)
    }
}

/// Returns true for a 503 whose envelope carries `isRejected: true`.
fn is_rejection(response: &HttpResponse) -> Result<bool, Error> {
    if response.status != REJECTED_STATUS {
        return Ok(false);
    }
    Ok(parse_envelope(&response.body)?.is_rejected)
}
