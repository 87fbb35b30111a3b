//! Webhook API.

use serde::{Deserialize, Serialize};

use super::json_body;
use crate::client::Pixela;
use crate::context::CallContext;
use crate::executor::{ApiResult, Error};
use crate::time::Sleeper;
use crate::transport::{HttpClient, HttpRequest};

/// Action a webhook performs on its graph when invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookType {
    Add,
    Increment,
    Decrement,
    Stopwatch,
    Subtract,
}

/// Input of [`Webhook::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookCreateInput {
    #[serde(rename = "graphID")]
    pub graph_id: String,
    #[serde(rename = "type")]
    pub kind: WebhookType,
    /// Quantity for `add` and `subtract` webhooks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}

/// Result of [`Webhook::create`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebhookCreateResult {
    /// Hash that identifies the webhook in invoke and delete calls.
    pub webhook_hash: String,
    #[serde(skip)]
    pub result: ApiResult,
}

/// A registered webhook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebhookDefinition {
    pub webhook_hash: String,
    #[serde(rename = "graphID", alias = "graphId")]
    pub graph_id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Result of [`Webhook::get_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebhookDefinitions {
    pub webhooks: Vec<WebhookDefinition>,
    #[serde(skip)]
    pub result: ApiResult,
}

/// Webhook API client.
#[derive(Debug)]
pub struct Webhook<'a, H, S> {
    client: &'a Pixela<H, S>,
}

impl<'a, H, S> Webhook<'a, H, S> {
    pub(crate) const fn new(client: &'a Pixela<H, S>) -> Self {
        Self { client }
    }

    fn webhook_url(&self, hash: Option<&str>) -> url::Url {
        let mut segments = vec!["webhooks"];
        segments.extend(hash);
        self.client.v1_url(&self.client.user_path(&segments))
    }

    pub(crate) fn create_request(&self, input: &WebhookCreateInput) -> Result<HttpRequest, Error> {
        let body = json_body(input)?;
        Ok(self
            .client
            .authed(HttpRequest::post(self.webhook_url(None)))
            .with_body(body))
    }

    pub(crate) fn get_all_request(&self) -> HttpRequest {
        self.client
            .authed(HttpRequest::get(self.webhook_url(None)))
    }

    pub(crate) fn delete_request(&self, hash: &str) -> HttpRequest {
        self.client
            .authed(HttpRequest::delete(self.webhook_url(Some(hash))))
    }

    /// The hash itself authorizes the call, so no token is sent.
    pub(crate) fn invoke_request(&self, hash: &str) -> HttpRequest {
        HttpRequest::post(self.webhook_url(Some(hash))).with_empty_content()
    }
}

impl<H: HttpClient, S: Sleeper> Webhook<'_, H, S> {
    /// Registers a webhook for a graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the body is not a creation result.
    pub async fn create(
        &self,
        ctx: &CallContext,
        input: &WebhookCreateInput,
    ) -> Result<WebhookCreateResult, Error> {
        let request = self.create_request(input)?;
        let raw = self.client.executor().execute_raw(ctx, &request).await?;
        let (mut created, result) = raw.decode::<WebhookCreateResult>()?;
        created.result = result;
        Ok(created)
    }

    /// Lists the user's webhooks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the body is not a webhook list.
    pub async fn get_all(&self, ctx: &CallContext) -> Result<WebhookDefinitions, Error> {
        let raw = self
            .client
            .executor()
            .execute_raw(ctx, &self.get_all_request())
            .await?;
        let (mut definitions, result) = raw.decode::<WebhookDefinitions>()?;
        definitions.result = result;
        Ok(definitions)
    }

    /// Deletes a webhook.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn delete(&self, ctx: &CallContext, hash: &str) -> Result<ApiResult, Error> {
        self.client
            .executor()
            .execute_and_parse(ctx, &self.delete_request(hash))
            .await
    }

    /// Invokes a webhook.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn invoke(&self, ctx: &CallContext, hash: &str) -> Result<ApiResult, Error> {
        self.client
            .executor()
            .execute_and_parse(ctx, &self.invoke_request(hash))
            .await
    }
}
