//! Resource clients for each area of the Pixela API.
//!
//! Each client borrows a [`Pixela`](crate::Pixela), builds an
//! [`HttpRequest`](crate::transport::HttpRequest) per call, and hands it to
//! the shared executor:
//! - [`User`] and [`UserProfile`]: account management
//! - [`Graph`]: graph definitions, SVG, stats, bulk pixel updates
//! - [`Pixel`]: single-day quantities
//! - [`Webhook`]: webhook registration and invocation
//! - [`Notification`] and [`Channel`]: notification rules and targets

mod channel;
mod graph;
mod notification;
mod pixel;
mod user;
mod user_profile;
mod webhook;

#[cfg(test)]
mod notification_tests;
#[cfg(test)]
mod pixel_tests;

pub use channel::{
    Channel, ChannelCreateInput, ChannelDefinition, ChannelDefinitions, ChannelDetail,
    ChannelUpdateInput, SlackDetail,
};
pub use graph::{
    Appearance, Graph, GraphColor, GraphCreateInput, GraphDefinition, GraphDefinitions,
    GraphDetail, GraphMode, GraphSvgInput, GraphType, GraphUpdateInput, PixelDates,
    PixelDatesInput, PixelEntry, PixelInput, Pixels, SelfSufficient, Stats,
};
pub use notification::{
    Notification, NotificationCondition, NotificationCreateInput, NotificationDefinition,
    NotificationDefinitions, NotificationTarget, NotificationUpdateInput,
};
pub use pixel::{Pixel, PixelCreateInput, PixelUpdateInput, Quantity};
pub use user::{User, UserCreateInput, UserUpdateInput};
pub use user_profile::{UserProfile, UserProfileUpdateInput};
pub use webhook::{
    Webhook, WebhookCreateInput, WebhookCreateResult, WebhookDefinition, WebhookDefinitions,
    WebhookType,
};

use serde::Serialize;

use crate::executor::Error;

/// Serializes a request body.
fn json_body<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(value).map_err(Error::Encode)
}

/// Appends the present query parameters, leaving the URL untouched when
/// none are set.
fn with_query(mut url: url::Url, params: &[(&str, Option<&str>)]) -> url::Url {
    let present: Vec<_> = params
        .iter()
        .filter_map(|(key, value)| value.map(|v| (*key, v)))
        .collect();
    if !present.is_empty() {
        url.query_pairs_mut().extend_pairs(present);
    }
    url
}

/// Body of the add/subtract endpoints.
#[derive(Serialize)]
struct QuantityBody<'a> {
    quantity: &'a str,
}
