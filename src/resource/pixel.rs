//! Pixel API: the quantity recorded for one date of a graph.

use serde::{Deserialize, Serialize};

use super::json_body;
use crate::client::Pixela;
use crate::context::CallContext;
use crate::executor::{ApiResult, Error};
use crate::time::Sleeper;
use crate::transport::{HttpClient, HttpRequest};

/// Input of [`Pixel::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelCreateInput {
    #[serde(skip)]
    pub graph_id: String,
    /// Date in `yyyyMMdd` format.
    pub date: String,
    pub quantity: String,
    /// JSON text of up to 10KB stored with the pixel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_data: Option<String>,
}

/// Input of [`Pixel::update`]. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelUpdateInput {
    #[serde(skip)]
    pub graph_id: String,
    #[serde(skip)]
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_data: Option<String>,
}

/// A pixel's value, from [`Pixel::get`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Quantity {
    pub quantity: String,
    pub optional_data: String,
    #[serde(skip)]
    pub result: ApiResult,
}

/// Pixel API client.
#[derive(Debug)]
pub struct Pixel<'a, H, S> {
    client: &'a Pixela<H, S>,
}

impl<'a, H, S> Pixel<'a, H, S> {
    pub(crate) const fn new(client: &'a Pixela<H, S>) -> Self {
        Self { client }
    }

    fn pixel_url(&self, graph_id: &str, rest: &[&str]) -> url::Url {
        let mut segments = vec!["graphs", graph_id];
        segments.extend_from_slice(rest);
        self.client.v1_url(&self.client.user_path(&segments))
    }

    pub(crate) fn create_request(&self, input: &PixelCreateInput) -> Result<HttpRequest, Error> {
        let body = json_body(input)?;
        Ok(self
            .client
            .authed(HttpRequest::post(self.pixel_url(&input.graph_id, &[])))
            .with_body(body))
    }

    pub(crate) fn step_request(&self, graph_id: &str, action: &str) -> HttpRequest {
        self.client
            .authed(HttpRequest::put(self.pixel_url(graph_id, &[action])))
            .with_empty_content()
    }

    pub(crate) fn get_request(&self, graph_id: &str, date: &str) -> HttpRequest {
        self.client
            .authed(HttpRequest::get(self.pixel_url(graph_id, &[date])))
    }

    pub(crate) fn update_request(&self, input: &PixelUpdateInput) -> Result<HttpRequest, Error> {
        let body = json_body(input)?;
        Ok(self
            .client
            .authed(HttpRequest::put(
                self.pixel_url(&input.graph_id, &[input.date.as_str()]),
            ))
            .with_body(body))
    }

    pub(crate) fn delete_request(&self, graph_id: &str, date: &str) -> HttpRequest {
        self.client
            .authed(HttpRequest::delete(self.pixel_url(graph_id, &[date])))
    }
}

impl<H: HttpClient, S: Sleeper> Pixel<'_, H, S> {
    /// Records the quantity for a date.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn create(
        &self,
        ctx: &CallContext,
        input: &PixelCreateInput,
    ) -> Result<ApiResult, Error> {
        let request = self.create_request(input)?;
        self.client.executor().execute_and_parse(ctx, &request).await
    }

    /// Increments today's pixel by the graph's step.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn increment(&self, ctx: &CallContext, graph_id: &str) -> Result<ApiResult, Error> {
        self.client
            .executor()
            .execute_and_parse(ctx, &self.step_request(graph_id, "increment"))
            .await
    }

    /// Decrements today's pixel by the graph's step.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn decrement(&self, ctx: &CallContext, graph_id: &str) -> Result<ApiResult, Error> {
        self.client
            .executor()
            .execute_and_parse(ctx, &self.step_request(graph_id, "decrement"))
            .await
    }

    /// Gets the quantity recorded for a date.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the body is not a quantity.
    pub async fn get(
        &self,
        ctx: &CallContext,
        graph_id: &str,
        date: &str,
    ) -> Result<Quantity, Error> {
        let raw = self
            .client
            .executor()
            .execute_raw(ctx, &self.get_request(graph_id, date))
            .await?;
        let (mut quantity, result) = raw.decode::<Quantity>()?;
        quantity.result = result;
        Ok(quantity)
    }

    /// Updates the quantity or optional data of a date.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn update(
        &self,
        ctx: &CallContext,
        input: &PixelUpdateInput,
    ) -> Result<ApiResult, Error> {
        let request = self.update_request(input)?;
        self.client.executor().execute_and_parse(ctx, &request).await
    }

    /// Deletes the pixel of a date.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn delete(
        &self,
        ctx: &CallContext,
        graph_id: &str,
        date: &str,
    ) -> Result<ApiResult, Error> {
        self.client
            .executor()
            .execute_and_parse(ctx, &self.delete_request(graph_id, date))
            .await
    }
}
