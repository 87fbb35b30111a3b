//! Entry point holding the user's credentials and the shared executor.

use crate::executor::{Error, Executor, RetryPolicy};
use crate::resource::{Channel, Graph, Notification, Pixel, User, UserProfile, Webhook};
use crate::time::TokioSleeper;
use crate::transport::{HttpRequest, ReqwestClient};

/// Base URL of the Pixela service.
pub const API_BASE_URL: &str = "https://pixe.la";

/// Path segment of the versioned API.
const V1_SEGMENT: &str = "v1";

/// Client for one Pixela user.
///
/// Holds the username/token pair and the executor every resource client
/// shares. Configuration is fixed at [`PixelaBuilder::build`]; the client
/// can then be shared across tasks.
///
/// # Example
///
/// ```no_run
/// use pixela::{CallContext, Pixela, RetryPolicy};
/// use pixela::resource::{GraphColor, GraphCreateInput, GraphType};
///
/// # async fn example() -> Result<(), pixela::Error> {
/// let client = Pixela::builder("a-know", "thisissecret")
///     .with_retry_policy(RetryPolicy::new().with_max_retry(10))
///     .build()?;
///
/// let input = GraphCreateInput::new("test-graph", "graph-name", "commit", GraphType::Int, GraphColor::Shibafu);
/// let result = client.graph().create(&CallContext::background(), &input).await?;
/// assert!(result.is_success);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Pixela<H = ReqwestClient, S = TokioSleeper> {
    username: String,
    token: String,
    token_header: http::HeaderValue,
    root: url::Url,
    v1: url::Url,
    executor: Executor<H, S>,
}

impl Pixela<ReqwestClient, TokioSleeper> {
    /// Creates a client against the public service with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToken`] if the token cannot be sent as a
    /// header value.
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Result<Self, Error> {
        Self::builder(username, token).build()
    }

    /// Starts building a client for the given user.
    #[must_use]
    pub fn builder(
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> PixelaBuilder<ReqwestClient, TokioSleeper> {
        PixelaBuilder {
            username: username.into(),
            token: token.into(),
            base_url: API_BASE_URL.to_string(),
            retry_policy: RetryPolicy::default(),
            client: ReqwestClient::new(),
            sleeper: TokioSleeper,
        }
    }
}

impl<H, S> Pixela<H, S> {
    /// Returns the username this client acts for.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the shared executor, for calls not covered by a resource.
    #[must_use]
    pub const fn executor(&self) -> &Executor<H, S> {
        &self.executor
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        self.executor.retry_policy()
    }

    /// User API.
    #[must_use]
    pub const fn user(&self) -> User<'_, H, S> {
        User::new(self)
    }

    /// User profile API.
    #[must_use]
    pub const fn user_profile(&self) -> UserProfile<'_, H, S> {
        UserProfile::new(self)
    }

    /// Graph API.
    #[must_use]
    pub const fn graph(&self) -> Graph<'_, H, S> {
        Graph::new(self)
    }

    /// Pixel API.
    #[must_use]
    pub const fn pixel(&self) -> Pixel<'_, H, S> {
        Pixel::new(self)
    }

    /// Webhook API.
    #[must_use]
    pub const fn webhook(&self) -> Webhook<'_, H, S> {
        Webhook::new(self)
    }

    /// Notification API.
    #[must_use]
    pub const fn notification(&self) -> Notification<'_, H, S> {
        Notification::new(self)
    }

    /// Channel API.
    #[must_use]
    pub const fn channel(&self) -> Channel<'_, H, S> {
        Channel::new(self)
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    /// Builds a URL under the unversioned root from path segments.
    pub(crate) fn root_url(&self, segments: &[&str]) -> url::Url {
        join_segments(&self.root, segments)
    }

    /// Builds a URL under `/v1` from path segments.
    pub(crate) fn v1_url(&self, segments: &[&str]) -> url::Url {
        join_segments(&self.v1, segments)
    }

    /// Segments of `/users/{username}` followed by `rest`.
    pub(crate) fn user_path<'a>(&'a self, rest: &[&'a str]) -> Vec<&'a str> {
        let mut segments = vec!["users", self.username.as_str()];
        segments.extend_from_slice(rest);
        segments
    }

    /// Adds the `X-USER-TOKEN` header to a request.
    pub(crate) fn authed(&self, request: HttpRequest) -> HttpRequest {
        request.with_user_token(self.token_header.clone())
    }
}

fn join_segments(base: &url::Url, segments: &[&str]) -> url::Url {
    let mut url = base.clone();
    // Base URLs are checked in `build`, so they always accept segments.
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Builder for [`Pixela`].
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation (defaults to [`ReqwestClient`])
/// - `S`: The sleeper used for retry backoff (defaults to [`TokioSleeper`])
#[derive(Debug)]
pub struct PixelaBuilder<H = ReqwestClient, S = TokioSleeper> {
    username: String,
    token: String,
    base_url: String,
    retry_policy: RetryPolicy,
    client: H,
    sleeper: S,
}

impl<H, S> PixelaBuilder<H, S> {
    /// Overrides the service base URL (defaults to [`API_BASE_URL`]).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the retry policy applied to every call.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Sets a custom HTTP client.
    #[must_use]
    pub fn with_http_client<H2>(self, client: H2) -> PixelaBuilder<H2, S> {
        PixelaBuilder {
            username: self.username,
            token: self.token,
            base_url: self.base_url,
            retry_policy: self.retry_policy,
            client,
            sleeper: self.sleeper,
        }
    }

    /// Sets a custom sleeper for retry delays.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> PixelaBuilder<H, S2> {
        PixelaBuilder {
            username: self.username,
            token: self.token,
            base_url: self.base_url,
            retry_policy: self.retry_policy,
            client: self.client,
            sleeper,
        }
    }

    /// Validates the configuration and builds the client.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBaseUrl`] if the base URL does not parse or cannot
    ///   carry path segments
    /// - [`Error::InvalidToken`] if the token is not a valid header value
    pub fn build(self) -> Result<Pixela<H, S>, Error> {
        let root = url::Url::parse(&self.base_url)
            .map_err(|e| Error::InvalidBaseUrl(format!("{}: {e}", self.base_url)))?;
        if root.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(self.base_url));
        }
        let v1 = join_segments(&root, &[V1_SEGMENT]);
        let token_header = http::HeaderValue::from_str(&self.token)?;

        Ok(Pixela {
            username: self.username,
            token: self.token,
            token_header,
            root,
            v1,
            executor: Executor::new(self.client)
                .with_sleeper(self.sleeper)
                .with_retry_policy(self.retry_policy),
        })
    }
}
