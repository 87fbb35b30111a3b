//! User profile API.

use serde::Serialize;

use super::json_body;
use crate::client::Pixela;
use crate::context::CallContext;
use crate::executor::{ApiResult, Error};
use crate::time::Sleeper;
use crate::transport::{HttpClient, HttpRequest};

/// Input of [`UserProfile::update`]. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileUpdateInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravatar_icon_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(rename = "aboutURL", skip_serializing_if = "Option::is_none")]
    pub about_url: Option<String>,
    #[serde(rename = "contributeURLs", skip_serializing_if = "Vec::is_empty")]
    pub contribute_urls: Vec<String>,
    #[serde(rename = "pinnedGraphID", skip_serializing_if = "Option::is_none")]
    pub pinned_graph_id: Option<String>,
}

/// User profile API client.
#[derive(Debug)]
pub struct UserProfile<'a, H, S> {
    client: &'a Pixela<H, S>,
}

impl<'a, H, S> UserProfile<'a, H, S> {
    pub(crate) const fn new(client: &'a Pixela<H, S>) -> Self {
        Self { client }
    }

    /// URL of the user's public profile page. No request is made.
    #[must_use]
    pub fn url(&self) -> url::Url {
        let page = format!("@{}", self.client.username());
        self.client.root_url(&[page.as_str()])
    }

    pub(crate) fn update_request(
        &self,
        input: &UserProfileUpdateInput,
    ) -> Result<HttpRequest, Error> {
        let body = json_body(input)?;
        Ok(self
            .client
            .authed(HttpRequest::put(self.url()))
            .with_body(body))
    }
}

impl<H: HttpClient, S: Sleeper> UserProfile<'_, H, S> {
    /// Updates the user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn update(
        &self,
        ctx: &CallContext,
        input: &UserProfileUpdateInput,
    ) -> Result<ApiResult, Error> {
        let request = self.update_request(input)?;
        self.client.executor().execute_and_parse(ctx, &request).await
    }
}
