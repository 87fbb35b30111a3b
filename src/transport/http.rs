//! Request and response values exchanged with an [`HttpClient`].

use super::HttpError;

/// Header carrying the user's API token on authenticated calls.
pub const USER_TOKEN_HEADER: &str = "x-user-token";

/// A request description handed to the executor.
///
/// Resource clients build one of these per call. It uses standard `http`
/// crate types for method and headers, so any [`HttpClient`] can send it.
/// The body may be empty; an empty body is not sent at all.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: http::Method,
    pub url: url::Url,
    pub headers: http::HeaderMap,
    /// JSON payload; empty for reads, deletes and action calls.
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Creates a request with no headers and no body.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(url: url::Url) -> Self {
        Self::new(http::Method::GET, url)
    }

    #[must_use]
    pub fn post(url: url::Url) -> Self {
        Self::new(http::Method::POST, url)
    }

    #[must_use]
    pub fn put(url: url::Url) -> Self {
        Self::new(http::Method::PUT, url)
    }

    #[must_use]
    pub fn delete(url: url::Url) -> Self {
        Self::new(http::Method::DELETE, url)
    }

    /// Replaces the body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Appends a header value, keeping earlier values of the same name.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Adds the `X-USER-TOKEN` header.
    #[must_use]
    pub fn with_user_token(self, token: http::HeaderValue) -> Self {
        self.with_header(http::HeaderName::from_static(USER_TOKEN_HEADER), token)
    }

    /// Marks an empty-body POST/PUT with an explicit `Content-Length: 0`.
    #[must_use]
    pub fn with_empty_content(self) -> Self {
        self.with_header(
            http::header::CONTENT_LENGTH,
            http::HeaderValue::from_static("0"),
        )
    }
}

/// A response with its body read to the end.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: http::StatusCode,
    pub headers: http::HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// True for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// One network round trip.
///
/// The executor's retry loop, envelope parsing and cancellation all sit
/// above this seam; an implementation sends exactly one request per call
/// and buffers the whole body before returning.
///
/// # Example
///
/// ```ignore
/// use pixela::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};
///
/// struct FixedClient {
///     response: HttpResponse,
/// }
///
/// impl HttpClient for FixedClient {
///     async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
///         Ok(self.response.clone())
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Sends an HTTP request and returns the response.
    ///
    /// Non-2xx statuses are returned as responses, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when:
    /// - Network connection fails ([`HttpError::Connection`])
    /// - Request times out ([`HttpError::Timeout`])
    /// - URL is invalid ([`HttpError::InvalidUrl`])
    /// - The response body cannot be read ([`HttpError::Body`])
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}
