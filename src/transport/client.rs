//! `HttpClient` backed by reqwest.

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// `User-Agent` sent by [`ReqwestClient::new`].
pub const USER_AGENT: &str = concat!("pixela-client/", env!("CARGO_PKG_VERSION"));

/// Sends requests over a pooled `reqwest::Client`.
///
/// [`ReqwestClient::new`] identifies itself with [`USER_AGENT`]; wrap a
/// preconfigured client with [`ReqwestClient::from_client`] for proxies,
/// custom TLS roots or transport-level timeouts.
///
/// # Example
///
/// ```no_run
/// use pixela::transport::{HttpClient, HttpRequest, ReqwestClient};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("https://pixe.la/v1/users/a-know/graphs/test-graph/stats")?;
/// let response = client.request(HttpRequest::get(url)).await?;
/// println!("{}: {}", response.status, response.body_text());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client with the crate's `User-Agent`.
    ///
    /// If the configured builder is rejected, the error is logged and a
    /// default `reqwest::Client` is used instead.
    ///
    /// # Panics
    ///
    /// The default client panics when the TLS backend cannot be initialized.
    #[must_use]
    pub fn new() -> Self {
        let inner = build_or_default(reqwest::Client::builder().user_agent(USER_AGENT));
        Self { inner }
    }

    /// Wraps an existing reqwest client as is.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }

    fn prepare(&self, req: HttpRequest) -> reqwest::RequestBuilder {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = req;

        let builder = self.inner.request(method, url).headers(headers);
        if body.is_empty() {
            builder
        } else {
            builder.body(body)
        }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let response = self.prepare(req).send().await.map_err(send_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        // Read to the end so the connection can be reused.
        let body = response.bytes().await.map_err(body_error)?;

        Ok(HttpResponse::new(status, headers, body.to_vec()))
    }
}

pub(super) fn build_or_default(builder: reqwest::ClientBuilder) -> reqwest::Client {
    builder.build().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "http client builder rejected, using reqwest defaults");
        reqwest::Client::default()
    })
}

fn send_error(err: reqwest::Error) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout
    } else if err.is_builder() {
        HttpError::InvalidUrl(err.to_string())
    } else {
        HttpError::Connection(Box::new(err))
    }
}

fn body_error(err: reqwest::Error) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Body(Box::new(err))
    }
}
