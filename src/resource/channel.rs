//! Channel API: destinations that notification rules post to.

use serde::{Deserialize, Serialize};

use super::json_body;
use crate::client::Pixela;
use crate::context::CallContext;
use crate::executor::{ApiResult, Error};
use crate::time::Sleeper;
use crate::transport::{HttpClient, HttpRequest};

const SLACK: &str = "slack";

/// Slack incoming-webhook settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlackDetail {
    pub url: String,
    pub user_name: String,
    pub channel_name: String,
}

/// Type-specific settings of a channel.
///
/// Serialized as the bare detail object; the `type` key is sent next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChannelDetail {
    Slack(SlackDetail),
}

impl ChannelDetail {
    /// Value of the channel's `type` key.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Slack(_) => SLACK,
        }
    }
}

/// Input of [`Channel::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCreateInput {
    pub id: String,
    pub name: String,
    pub detail: ChannelDetail,
}

/// Input of [`Channel::update`]. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelUpdateInput {
    pub id: String,
    pub name: Option<String>,
    pub detail: Option<ChannelDetail>,
}

#[derive(Serialize)]
struct ChannelBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a ChannelDetail>,
}

/// A channel as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDefinition {
    pub id: String,
    pub name: String,
    /// Value of the `type` key.
    pub kind: String,
    pub detail: ChannelDetail,
}

/// Result of [`Channel::get_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelDefinitions {
    pub channels: Vec<ChannelDefinition>,
    pub result: ApiResult,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct WireChannels {
    channels: Vec<WireChannel>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct WireChannel {
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    detail: serde_json::Value,
}

impl TryFrom<WireChannel> for ChannelDefinition {
    type Error = Error;

    fn try_from(wire: WireChannel) -> Result<Self, Error> {
        let detail = match wire.kind.as_str() {
            SLACK => ChannelDetail::Slack(
                SlackDetail::deserialize(&wire.detail)
                    .map_err(|e| Error::decode(wire.detail.to_string().as_bytes(), e))?,
            ),
            other => return Err(Error::UnsupportedChannelType(other.to_string())),
        };
        Ok(Self {
            id: wire.id,
            name: wire.name,
            kind: wire.kind,
            detail,
        })
    }
}

/// Channel API client.
#[derive(Debug)]
pub struct Channel<'a, H, S> {
    client: &'a Pixela<H, S>,
}

impl<'a, H, S> Channel<'a, H, S> {
    pub(crate) const fn new(client: &'a Pixela<H, S>) -> Self {
        Self { client }
    }

    fn channel_url(&self, id: Option<&str>) -> url::Url {
        let mut segments = vec!["channels"];
        segments.extend(id);
        self.client.root_url(&self.client.user_path(&segments))
    }

    pub(crate) fn create_request(&self, input: &ChannelCreateInput) -> Result<HttpRequest, Error> {
        let body = json_body(&ChannelBody {
            id: Some(input.id.as_str()),
            name: Some(input.name.as_str()),
            kind: Some(input.detail.kind()),
            detail: Some(&input.detail),
        })?;
        Ok(self
            .client
            .authed(HttpRequest::post(self.channel_url(None)))
            .with_body(body))
    }

    pub(crate) fn get_all_request(&self) -> HttpRequest {
        self.client
            .authed(HttpRequest::get(self.channel_url(None)))
    }

    pub(crate) fn update_request(&self, input: &ChannelUpdateInput) -> Result<HttpRequest, Error> {
        let body = json_body(&ChannelBody {
            id: None,
            name: input.name.as_deref(),
            kind: input.detail.as_ref().map(ChannelDetail::kind),
            detail: input.detail.as_ref(),
        })?;
        Ok(self
            .client
            .authed(HttpRequest::put(self.channel_url(Some(input.id.as_str()))))
            .with_body(body))
    }

    pub(crate) fn delete_request(&self, id: &str) -> HttpRequest {
        self.client
            .authed(HttpRequest::delete(self.channel_url(Some(id))))
    }
}

impl<H: HttpClient, S: Sleeper> Channel<'_, H, S> {
    /// Creates a channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn create(
        &self,
        ctx: &CallContext,
        input: &ChannelCreateInput,
    ) -> Result<ApiResult, Error> {
        let request = self.create_request(input)?;
        self.client.executor().execute_and_parse(ctx, &request).await
    }

    /// Lists the user's channels.
    ///
    /// # Errors
    ///
    /// - [`Error::Decode`] if the body or a channel's detail does not decode
    /// - [`Error::UnsupportedChannelType`] if a channel has an unknown type
    pub async fn get_all(&self, ctx: &CallContext) -> Result<ChannelDefinitions, Error> {
        let raw = self
            .client
            .executor()
            .execute_raw(ctx, &self.get_all_request())
            .await?;
        let (wire, result) = raw.decode::<WireChannels>()?;
        let channels = wire
            .channels
            .into_iter()
            .map(ChannelDefinition::try_from)
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(ChannelDefinitions { channels, result })
    }

    /// Updates a channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn update(
        &self,
        ctx: &CallContext,
        input: &ChannelUpdateInput,
    ) -> Result<ApiResult, Error> {
        let request = self.update_request(input)?;
        self.client.executor().execute_and_parse(ctx, &request).await
    }

    /// Deletes a channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn delete(&self, ctx: &CallContext, id: &str) -> Result<ApiResult, Error> {
        self.client
            .executor()
            .execute_and_parse(ctx, &self.delete_request(id))
            .await
    }
}
