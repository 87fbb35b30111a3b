//! User API: account registration, token rotation and removal.

use serde::Serialize;

use super::json_body;
use crate::client::Pixela;
use crate::context::CallContext;
use crate::executor::{ApiResult, Error};
use crate::time::Sleeper;
use crate::transport::{HttpClient, HttpRequest};

/// Input of [`User::create`]. The username and token come from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserCreateInput {
    pub agree_terms_of_service: bool,
    pub not_minor: bool,
    pub thanks_code: Option<String>,
}

/// Input of [`User::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdateInput {
    pub new_token: String,
    pub thanks_code: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBody<'a> {
    token: &'a str,
    username: &'a str,
    agree_terms_of_service: &'static str,
    not_minor: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    thanks_code: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBody<'a> {
    new_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    thanks_code: Option<&'a str>,
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// User API client.
#[derive(Debug)]
pub struct User<'a, H, S> {
    client: &'a Pixela<H, S>,
}

impl<'a, H, S> User<'a, H, S> {
    pub(crate) const fn new(client: &'a Pixela<H, S>) -> Self {
        Self { client }
    }

    /// Registration carries the token in its body instead of the header.
    pub(crate) fn create_request(&self, input: &UserCreateInput) -> Result<HttpRequest, Error> {
        let body = json_body(&CreateBody {
            token: self.client.token(),
            username: self.client.username(),
            agree_terms_of_service: yes_no(input.agree_terms_of_service),
            not_minor: yes_no(input.not_minor),
            thanks_code: input.thanks_code.as_deref(),
        })?;
        Ok(HttpRequest::post(self.client.root_url(&["users"])).with_body(body))
    }

    pub(crate) fn update_request(&self, input: &UserUpdateInput) -> Result<HttpRequest, Error> {
        let body = json_body(&UpdateBody {
            new_token: &input.new_token,
            thanks_code: input.thanks_code.as_deref(),
        })?;
        Ok(self
            .client
            .authed(HttpRequest::put(
                self.client.root_url(&self.client.user_path(&[])),
            ))
            .with_body(body))
    }

    pub(crate) fn delete_request(&self) -> HttpRequest {
        self.client.authed(HttpRequest::delete(
            self.client.root_url(&self.client.user_path(&[])),
        ))
    }
}

impl<H: HttpClient, S: Sleeper> User<'_, H, S> {
    /// Registers the client's username with its token.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn create(
        &self,
        ctx: &CallContext,
        input: &UserCreateInput,
    ) -> Result<ApiResult, Error> {
        let request = self.create_request(input)?;
        self.client.executor().execute_and_parse(ctx, &request).await
    }

    /// Replaces the user's token.
    ///
    /// The client keeps sending the old token; build a new client with
    /// `new_token` after a successful update.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn update(
        &self,
        ctx: &CallContext,
        input: &UserUpdateInput,
    ) -> Result<ApiResult, Error> {
        let request = self.update_request(input)?;
        self.client.executor().execute_and_parse(ctx, &request).await
    }

    /// Deletes the user and all of their graphs.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn delete(&self, ctx: &CallContext) -> Result<ApiResult, Error> {
        self.client
            .executor()
            .execute_and_parse(ctx, &self.delete_request())
            .await
    }
}
