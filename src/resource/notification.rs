//! Notification API: threshold rules that post to a channel.

use serde::{Deserialize, Serialize};

use super::json_body;
use crate::client::Pixela;
use crate::context::CallContext;
use crate::executor::{ApiResult, Error};
use crate::time::Sleeper;
use crate::transport::{HttpClient, HttpRequest};

/// Value a notification rule watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationTarget {
    Quantity,
}

/// Comparison between the target and the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationCondition {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "multipleOf")]
    MultipleOf,
}

/// Input of [`Notification::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCreateInput {
    #[serde(skip)]
    pub graph_id: String,
    pub id: String,
    pub name: String,
    pub target: NotificationTarget,
    pub condition: NotificationCondition,
    pub threshold: String,
    /// Time of day (`HH:mm`) to remind if the condition is still unmet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remind_by: Option<String>,
    #[serde(rename = "channelID")]
    pub channel_id: String,
}

/// Input of [`Notification::update`]. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationUpdateInput {
    #[serde(skip)]
    pub graph_id: String,
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<NotificationTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<NotificationCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remind_by: Option<String>,
    #[serde(rename = "channelID", skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}

/// A notification rule as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationDefinition {
    pub id: String,
    pub name: String,
    pub target: String,
    pub condition: String,
    pub threshold: String,
    pub remind_by: String,
    #[serde(rename = "channelID")]
    pub channel_id: String,
}

/// Result of [`Notification::get_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotificationDefinitions {
    pub notifications: Vec<NotificationDefinition>,
    #[serde(skip)]
    pub result: ApiResult,
}

/// Notification API client.
#[derive(Debug)]
pub struct Notification<'a, H, S> {
    client: &'a Pixela<H, S>,
}

impl<'a, H, S> Notification<'a, H, S> {
    pub(crate) const fn new(client: &'a Pixela<H, S>) -> Self {
        Self { client }
    }

    fn notification_url(&self, graph_id: &str, id: Option<&str>) -> url::Url {
        let mut segments = vec!["graphs", graph_id, "notifications"];
        segments.extend(id);
        self.client.root_url(&self.client.user_path(&segments))
    }

    pub(crate) fn create_request(
        &self,
        input: &NotificationCreateInput,
    ) -> Result<HttpRequest, Error> {
        let body = json_body(input)?;
        Ok(self
            .client
            .authed(HttpRequest::post(
                self.notification_url(&input.graph_id, None),
            ))
            .with_body(body))
    }

    pub(crate) fn get_all_request(&self, graph_id: &str) -> HttpRequest {
        self.client
            .authed(HttpRequest::get(self.notification_url(graph_id, None)))
    }

    pub(crate) fn update_request(
        &self,
        input: &NotificationUpdateInput,
    ) -> Result<HttpRequest, Error> {
        let body = json_body(input)?;
        Ok(self
            .client
            .authed(HttpRequest::put(
                self.notification_url(&input.graph_id, Some(input.id.as_str())),
            ))
            .with_body(body))
    }

    pub(crate) fn delete_request(&self, graph_id: &str, id: &str) -> HttpRequest {
        self.client
            .authed(HttpRequest::delete(self.notification_url(graph_id, Some(id))))
    }
}

impl<H: HttpClient, S: Sleeper> Notification<'_, H, S> {
    /// Creates a notification rule on a graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn create(
        &self,
        ctx: &CallContext,
        input: &NotificationCreateInput,
    ) -> Result<ApiResult, Error> {
        let request = self.create_request(input)?;
        self.client.executor().execute_and_parse(ctx, &request).await
    }

    /// Lists the notification rules of a graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the body is not a notification list.
    pub async fn get_all(
        &self,
        ctx: &CallContext,
        graph_id: &str,
    ) -> Result<NotificationDefinitions, Error> {
        let raw = self
            .client
            .executor()
            .execute_raw(ctx, &self.get_all_request(graph_id))
            .await?;
        let (mut definitions, result) = raw.decode::<NotificationDefinitions>()?;
        definitions.result = result;
        Ok(definitions)
    }

    /// Updates a notification rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn update(
        &self,
        ctx: &CallContext,
        input: &NotificationUpdateInput,
    ) -> Result<ApiResult, Error> {
        let request = self.update_request(input)?;
        self.client.executor().execute_and_parse(ctx, &request).await
    }

    /// Deletes a notification rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn delete(
        &self,
        ctx: &CallContext,
        graph_id: &str,
        id: &str,
    ) -> Result<ApiResult, Error> {
        self.client
            .executor()
            .execute_and_parse(ctx, &self.delete_request(graph_id, id))
            .await
    }
}
