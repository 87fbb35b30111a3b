//! Graph API: definitions, SVG rendering, stats and bulk pixel updates.

use serde::{Deserialize, Serialize};

use super::{QuantityBody, json_body, with_query};
use crate::client::Pixela;
use crate::context::CallContext;
use crate::executor::{ApiResult, Error};
use crate::time::Sleeper;
use crate::transport::{HttpClient, HttpRequest};

/// Type of quantity a graph records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphType {
    /// Integer quantities.
    Int,
    /// Floating-point quantities.
    Float,
}

/// Display color of a graph's pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphColor {
    /// Green.
    Shibafu,
    /// Red.
    Momiji,
    /// Blue.
    Sora,
    /// Yellow.
    Ichou,
    /// Purple.
    Ajisai,
    /// Black.
    Kuro,
}

/// What happens to today's pixel when the graph's SVG is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfSufficient {
    /// Each fetch increments the pixel.
    Increment,
    /// Each fetch decrements the pixel.
    Decrement,
    /// Fetching does not change the pixel.
    None,
}

/// Rendering mode for the SVG and HTML views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GraphMode {
    /// Roughly the last 90 days.
    Short,
    /// Badge of the last 49 days in 7 pixels.
    Badge,
    /// Line chart.
    Line,
    /// Simple HTML view.
    Simple,
    /// Simple HTML view, short range.
    SimpleShort,
}

impl GraphMode {
    /// Value used in the `mode` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Badge => "badge",
            Self::Line => "line",
            Self::Simple => "simple",
            Self::SimpleShort => "simple-short",
        }
    }
}

/// SVG color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    /// Dark theme.
    Dark,
}

impl Appearance {
    /// Value used in the `appearance` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
        }
    }
}

/// Input of [`Graph::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphCreateInput {
    pub id: String,
    pub name: String,
    pub unit: String,
    #[serde(rename = "type")]
    pub kind: GraphType,
    pub color: GraphColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_sufficient: Option<SelfSufficient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_secret: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_optional_data: Option<bool>,
}

impl GraphCreateInput {
    /// Creates an input with the required fields set.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        kind: GraphType,
        color: GraphColor,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit: unit.into(),
            kind,
            color,
            timezone: None,
            self_sufficient: None,
            is_secret: None,
            publish_optional_data: None,
        }
    }
}

/// Input of [`Graph::update`]. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphUpdateInput {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<GraphColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(rename = "purgeCacheURLs", skip_serializing_if = "Option::is_none")]
    pub purge_cache_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_sufficient: Option<SelfSufficient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_secret: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_optional_data: Option<bool>,
}

/// Input of [`Graph::get_svg`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSvgInput {
    pub id: String,
    /// Render the graph as of this date (`yyyyMMdd`).
    pub date: Option<String>,
    pub mode: Option<GraphMode>,
    pub appearance: Option<Appearance>,
}

/// One pixel in a bulk update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelInput {
    pub date: String,
    pub quantity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_data: Option<String>,
}

/// Input of [`Graph::get_pixel_dates`].
///
/// Without `from`/`to` the service returns the last 365 days. The range
/// may not exceed 365 days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelDatesInput {
    pub id: String,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Return quantities and optional data along with the dates.
    pub with_body: bool,
}

/// A graph definition as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphDefinition {
    pub id: String,
    pub name: String,
    pub unit: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
    pub timezone: String,
    #[serde(rename = "purgeCacheURLs")]
    pub purge_cache_urls: Vec<String>,
    pub self_sufficient: String,
    pub is_secret: bool,
    pub publish_optional_data: bool,
}

/// Result of [`Graph::get`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphDetail {
    pub definition: GraphDefinition,
    pub result: ApiResult,
}

/// Result of [`Graph::get_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GraphDefinitions {
    pub graphs: Vec<GraphDefinition>,
    #[serde(skip)]
    pub result: ApiResult,
}

/// Statistics of a graph, from [`Graph::stats`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stats {
    pub total_pixels_count: u64,
    pub max_quantity: f64,
    pub max_date: String,
    pub min_quantity: f64,
    pub min_date: String,
    pub total_quantity: f64,
    pub avg_quantity: f64,
    pub todays_quantity: f64,
    pub yesterday_quantity: f64,
    #[serde(skip)]
    pub result: ApiResult,
}

/// A pixel returned when the list was requested with a body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PixelEntry {
    pub date: String,
    pub quantity: String,
    pub optional_data: String,
}

/// The two shapes of a pixel list.
///
/// Which one is decoded is decided by [`PixelDatesInput::with_body`], not by
/// inspecting the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pixels {
    /// Dates only (`yyyyMMdd`).
    Bare(Vec<String>),
    /// Dates with quantity and optional data.
    WithBody(Vec<PixelEntry>),
}

impl Default for Pixels {
    fn default() -> Self {
        Self::Bare(Vec::new())
    }
}

impl Pixels {
    /// Number of pixels in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Bare(dates) => dates.len(),
            Self::WithBody(entries) => entries.len(),
        }
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dates of every pixel, whichever shape was decoded.
    #[must_use]
    pub fn dates(&self) -> Vec<&str> {
        match self {
            Self::Bare(dates) => dates.iter().map(String::as_str).collect(),
            Self::WithBody(entries) => entries.iter().map(|e| e.date.as_str()).collect(),
        }
    }
}

/// Result of [`Graph::get_pixel_dates`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelDates {
    pub pixels: Pixels,
    pub result: ApiResult,
}

#[derive(Deserialize)]
#[serde(default)]
struct PixelList<T> {
    pixels: Vec<T>,
}

impl<T> Default for PixelList<T> {
    fn default() -> Self {
        Self { pixels: Vec::new() }
    }
}

/// Graph API client.
#[derive(Debug)]
pub struct Graph<'a, H, S> {
    client: &'a Pixela<H, S>,
}

impl<'a, H, S> Graph<'a, H, S> {
    pub(crate) const fn new(client: &'a Pixela<H, S>) -> Self {
        Self { client }
    }

    /// URL of the graph's HTML page. No request is made.
    #[must_use]
    pub fn url(&self, id: &str, mode: Option<GraphMode>) -> url::Url {
        let page = format!("{id}.html");
        let url = self
            .client
            .v1_url(&self.client.user_path(&["graphs", page.as_str()]));
        with_query(url, &[("mode", mode.map(GraphMode::as_str))])
    }

    fn graph_url(&self, rest: &[&str]) -> url::Url {
        let mut segments = vec!["graphs"];
        segments.extend_from_slice(rest);
        self.client.v1_url(&self.client.user_path(&segments))
    }

    pub(crate) fn create_request(&self, input: &GraphCreateInput) -> Result<HttpRequest, Error> {
        let body = json_body(input)?;
        Ok(self
            .client
            .authed(HttpRequest::post(self.graph_url(&[])))
            .with_body(body))
    }

    pub(crate) fn get_all_request(&self) -> HttpRequest {
        self.client.authed(HttpRequest::get(self.graph_url(&[])))
    }

    pub(crate) fn get_request(&self, id: &str) -> HttpRequest {
        self.client
            .authed(HttpRequest::get(self.graph_url(&[id, "graph-def"])))
    }

    pub(crate) fn svg_request(&self, input: &GraphSvgInput) -> HttpRequest {
        let url = with_query(
            self.graph_url(&[input.id.as_str()]),
            &[
                ("date", input.date.as_deref()),
                ("mode", input.mode.map(GraphMode::as_str)),
                ("appearance", input.appearance.map(Appearance::as_str)),
            ],
        );
        self.client.authed(HttpRequest::get(url))
    }

    pub(crate) fn stats_request(&self, id: &str) -> HttpRequest {
        HttpRequest::get(self.graph_url(&[id, "stats"]))
    }

    pub(crate) fn update_request(&self, input: &GraphUpdateInput) -> Result<HttpRequest, Error> {
        let body = json_body(input)?;
        Ok(self
            .client
            .authed(HttpRequest::put(self.graph_url(&[input.id.as_str()])))
            .with_body(body))
    }

    pub(crate) fn delete_request(&self, id: &str) -> HttpRequest {
        self.client
            .authed(HttpRequest::delete(self.graph_url(&[id])))
    }

    pub(crate) fn update_pixels_request(
        &self,
        id: &str,
        pixels: &[PixelInput],
    ) -> Result<HttpRequest, Error> {
        let body = json_body(pixels)?;
        Ok(self
            .client
            .authed(HttpRequest::post(self.graph_url(&[id, "pixels"])))
            .with_body(body))
    }

    pub(crate) fn pixel_dates_request(&self, input: &PixelDatesInput) -> HttpRequest {
        let url = with_query(
            self.graph_url(&[input.id.as_str(), "pixels"]),
            &[
                ("from", input.from.as_deref()),
                ("to", input.to.as_deref()),
                ("withBody", input.with_body.then_some("true")),
            ],
        );
        self.client.authed(HttpRequest::get(url))
    }

    pub(crate) fn stopwatch_request(&self, id: &str) -> HttpRequest {
        self.client
            .authed(HttpRequest::post(self.graph_url(&[id, "stopwatch"])))
            .with_empty_content()
    }

    pub(crate) fn quantity_request(
        &self,
        id: &str,
        action: &str,
        quantity: &str,
    ) -> Result<HttpRequest, Error> {
        let body = json_body(&QuantityBody { quantity })?;
        Ok(self
            .client
            .authed(HttpRequest::put(self.graph_url(&[id, action])))
            .with_body(body))
    }
}

impl<H: HttpClient, S: Sleeper> Graph<'_, H, S> {
    /// Creates a new graph definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails; a refusal by the service is
    /// reported through [`ApiResult::is_success`].
    pub async fn create(
        &self,
        ctx: &CallContext,
        input: &GraphCreateInput,
    ) -> Result<ApiResult, Error> {
        let request = self.create_request(input)?;
        self.client.executor().execute_and_parse(ctx, &request).await
    }

    /// Gets all graph definitions of the user.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the body is not a graph list.
    pub async fn get_all(&self, ctx: &CallContext) -> Result<GraphDefinitions, Error> {
        let raw = self
            .client
            .executor()
            .execute_raw(ctx, &self.get_all_request())
            .await?;
        let (mut definitions, result) = raw.decode::<GraphDefinitions>()?;
        definitions.result = result;
        Ok(definitions)
    }

    /// Gets one graph definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the body is not a definition.
    pub async fn get(&self, ctx: &CallContext, id: &str) -> Result<GraphDetail, Error> {
        let raw = self
            .client
            .executor()
            .execute_raw(ctx, &self.get_request(id))
            .await?;
        let (definition, result) = raw.decode::<GraphDefinition>()?;
        Ok(GraphDetail { definition, result })
    }

    /// Renders the graph as an SVG document.
    ///
    /// Sent once without retries; any status of 300 or above fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Status`] with the body text on a non-success status.
    pub async fn get_svg(&self, ctx: &CallContext, input: &GraphSvgInput) -> Result<String, Error> {
        let body = self
            .client
            .executor()
            .execute_strict(ctx, &self.svg_request(input))
            .await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Gets statistics of a graph. Does not need the token.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the body is not stats.
    pub async fn stats(&self, ctx: &CallContext, id: &str) -> Result<Stats, Error> {
        let raw = self
            .client
            .executor()
            .execute_raw(ctx, &self.stats_request(id))
            .await?;
        let (mut stats, result) = raw.decode::<Stats>()?;
        stats.result = result;
        Ok(stats)
    }

    /// Updates a graph definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn update(
        &self,
        ctx: &CallContext,
        input: &GraphUpdateInput,
    ) -> Result<ApiResult, Error> {
        let request = self.update_request(input)?;
        self.client.executor().execute_and_parse(ctx, &request).await
    }

    /// Deletes a graph definition.
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

    /// Registers several pixels in one call.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn update_pixels(
        &self,
        ctx: &CallContext,
        id: &str,
        pixels: &[PixelInput],
    ) -> Result<ApiResult, Error> {
        let request = self.update_pixels_request(id, pixels)?;
        self.client.executor().execute_and_parse(ctx, &request).await
    }

    /// Lists the pixels registered in a graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the list does not have the shape
    /// selected by [`PixelDatesInput::with_body`].
    pub async fn get_pixel_dates(
        &self,
        ctx: &CallContext,
        input: &PixelDatesInput,
    ) -> Result<PixelDates, Error> {
        let raw = self
            .client
            .executor()
            .execute_raw(ctx, &self.pixel_dates_request(input))
            .await?;

        if input.with_body {
            let (list, result) = raw.decode::<PixelList<PixelEntry>>()?;
            Ok(PixelDates {
                pixels: Pixels::WithBody(list.pixels),
                result,
            })
        } else {
            let (list, result) = raw.decode::<PixelList<String>>()?;
            Ok(PixelDates {
                pixels: Pixels::Bare(list.pixels),
                result,
            })
        }
    }

    /// Starts or stops the stopwatch of a graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn stopwatch(&self, ctx: &CallContext, id: &str) -> Result<ApiResult, Error> {
        self.client
            .executor()
            .execute_and_parse(ctx, &self.stopwatch_request(id))
            .await
    }

    /// Adds `quantity` to today's pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn add(
        &self,
        ctx: &CallContext,
        id: &str,
        quantity: &str,
    ) -> Result<ApiResult, Error> {
        let request = self.quantity_request(id, "add", quantity)?;
        self.client.executor().execute_and_parse(ctx, &request).await
    }

    /// Subtracts `quantity` from today's pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn subtract(
        &self,
        ctx: &CallContext,
        id: &str,
        quantity: &str,
    ) -> Result<ApiResult, Error> {
        let request = self.quantity_request(id, "subtract", quantity)?;
        self.client.executor().execute_and_parse(ctx, &request).await
    }
}
