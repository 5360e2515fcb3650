//! # REST client for the marketplace backend
//!
//! [`ApiClient`] issues one HTTP request per call against the configured base
//! url, attaching `Authorization: Bearer <token>` whenever the [`TokenStore`]
//! holds a token. It implements [`MarketplaceApi`], the seam the
//! [`crate::Session`] is generic over, so tests can swap in a fake backend.
//!
//! ## Endpoints
//!
//! | Method | Path | Call |
//! |--------|------|------|
//! | `GET` | `/users/me` | [`current_user`](MarketplaceApi::current_user) |
//! | `PUT` | `/users/me` | [`update_profile`](MarketplaceApi::update_profile) |
//! | `GET` | `{R::PATH}` | [`list`](MarketplaceApi::list) |
//! | `GET` | `{R::PATH}/{id}` | [`get`](MarketplaceApi::get) |
//! | `POST` | `{R::PATH}` | [`create`](MarketplaceApi::create) |
//! | `DELETE` | `{R::PATH}/{id}` | [`delete`](MarketplaceApi::delete) |
//!
//! `R` is any [`Resource`]: rides, donations, lost-found items, products,
//! trips and giveaways.
//!
//! ## Errors
//!
//! Non-success responses become [`ApiError`] via [`ApiError::from_status`].
//! The message is taken from a JSON `detail` or `message` field when present,
//! falling back to the raw body.

use std::future::Future;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use store::{ProfileUpdate, Resource, TokenStore, User};

use crate::error::ApiError;

const USERS_ME: &str = "/users/me";

/// Async interface to the marketplace backend.
pub trait MarketplaceApi {
    fn current_user(&self) -> impl Future<Output = Result<User, ApiError>>;

    fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<User, ApiError>>;

    fn list<R: Resource>(&self) -> impl Future<Output = Result<Vec<R>, ApiError>>;

    fn get<R: Resource>(&self, id: &str) -> impl Future<Output = Result<R, ApiError>>;

    fn create<R: Resource>(
        &self,
        draft: &R::Draft,
    ) -> impl Future<Output = Result<R, ApiError>>;

    fn delete<R: Resource>(&self, id: &str) -> impl Future<Output = Result<(), ApiError>>;
}

/// HTTP implementation of [`MarketplaceApi`].
#[derive(Clone, Debug)]
pub struct ApiClient<T> {
    http: reqwest::Client,
    base_url: String,
    tokens: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl<T: TokenStore> ApiClient<T> {
    pub fn new(base_url: impl Into<String>, tokens: T) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, tokens)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>, tokens: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &T {
        &self.tokens
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, url);
        match self.tokens.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn fetch<R: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<R, ApiError> {
        let response = check(builder.send().await?).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Pass through success responses, convert everything else to [`ApiError`].
pub(crate) async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    tracing::debug!("Request failed with {}: {}", status, message);
    Err(ApiError::from_status(status, message))
}

fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return Some(body.to_string());
    };
    let value = parsed.detail.or(parsed.message).or(parsed.error)?;
    Some(match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

impl<T: TokenStore> MarketplaceApi for ApiClient<T> {
    async fn current_user(&self) -> Result<User, ApiError> {
        self.fetch(self.request(Method::GET, USERS_ME)).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.fetch(self.request(Method::PUT, USERS_ME).json(update))
            .await
    }

    async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        self.fetch(self.request(Method::GET, R::PATH)).await
    }

    async fn get<R: Resource>(&self, id: &str) -> Result<R, ApiError> {
        let path = format!("{}/{}", R::PATH, id);
        self.fetch(self.request(Method::GET, &path)).await
    }

    async fn create<R: Resource>(&self, draft: &R::Draft) -> Result<R, ApiError> {
        self.fetch(self.request(Method::POST, R::PATH).json(draft))
            .await
    }

    async fn delete<R: Resource>(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("{}/{}", R::PATH, id);
        check(self.request(Method::DELETE, &path).send().await?).await?;
        Ok(())
    }
}
