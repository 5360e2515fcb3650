//! # Auth provider client
//!
//! Members sign in through a hosted, Supabase-style auth provider using OAuth.
//! The browser is sent to the provider's authorize endpoint, and the provider
//! redirects back to `/auth/callback` with the tokens in the URL fragment.
//!
//! ## Flow
//!
//! 1. **[`authorize_url`](AuthClient::authorize_url)** builds
//!    `{url}/auth/v1/authorize?provider=google&redirect_to={origin}/auth/callback`.
//! 2. **[`parse_callback`]** reads `access_token`, `refresh_token`,
//!    `expires_in` and `token_type` out of the callback fragment, or turns
//!    `error` / `error_description` into [`ApiError::AuthCallback`].
//! 3. The access token is handed to [`crate::Session::login_with_token`].
//! 4. **[`get_session`](AuthClient::get_session)** asks the provider who a token
//!    belongs to; an expired token yields `None` rather than an error.
//! 5. **[`sign_out`](AuthClient::sign_out)** revokes the token on the provider.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use store::AuthConfig;
use url::Url;

use crate::client::check;
use crate::error::ApiError;

/// OAuth identity providers enabled on the auth service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Github,
    Azure,
}

impl OAuthProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Github => "github",
            OAuthProvider::Azure => "azure",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OAuthProvider::Google => "Google",
            OAuthProvider::Github => "GitHub",
            OAuthProvider::Azure => "Microsoft",
        }
    }
}

/// The provider's view of a signed-in account.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Tokens delivered to the callback page.
#[derive(Clone, Debug, PartialEq)]
pub struct CallbackTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub token_type: Option<String>,
}

/// Client for the auth provider's REST endpoints.
#[derive(Clone, Debug)]
pub struct AuthClient {
    http: reqwest::Client,
    config: AuthConfig,
}

impl AuthClient {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        if self.config.url.trim().is_empty() {
            return Err(ApiError::Config("auth url is not set".to_string()));
        }
        let base = format!("{}/auth/v1/", self.config.url.trim_end_matches('/'));
        Url::parse(&base)
            .and_then(|u| u.join(path))
            .map_err(|e| ApiError::Config(format!("invalid auth url: {e}")))
    }

    fn request(&self, method: Method, url: Url, access_token: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
    }

    /// Where to send the browser to sign in with `provider`. `origin` is the
    /// site root, e.g. `https://market.example.edu`.
    pub fn authorize_url(&self, provider: OAuthProvider, origin: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint("authorize")?;
        let redirect_to = format!(
            "{}/{}",
            origin.trim_end_matches('/'),
            self.config.callback_path.trim_start_matches('/')
        );
        url.query_pairs_mut()
            .append_pair("provider", provider.as_str())
            .append_pair("redirect_to", &redirect_to);
        Ok(url)
    }

    /// The account `access_token` belongs to, or `None` once it has expired.
    pub async fn get_session(&self, access_token: &str) -> Result<Option<AuthUser>, ApiError> {
        let url = self.endpoint("user")?;
        let response = self.request(Method::GET, url, access_token).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        let body = check(response).await?.text().await?;
        Ok(Some(serde_json::from_str(&body)?))
    }

    /// Revoke `access_token` on the provider.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), ApiError> {
        let url = self.endpoint("logout")?;
        let response = self.request(Method::POST, url, access_token).send().await?;
        // Already-expired tokens count as signed out
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        check(response).await?;
        Ok(())
    }
}

/// Parse the fragment (or query) the provider appends to the callback url.
/// A leading `#` or `?` is ignored.
pub fn parse_callback(fragment: &str) -> Result<CallbackTokens, ApiError> {
    let fragment = fragment.trim_start_matches(['#', '?']);
    let mut access_token = None;
    let mut refresh_token = None;
    let mut expires_in = None;
    let mut token_type = None;
    let mut error = None;
    let mut error_description = None;

    for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
        match key.as_ref() {
            "access_token" => access_token = Some(value.into_owned()),
            "refresh_token" => refresh_token = Some(value.into_owned()),
            "expires_in" => expires_in = value.parse().ok(),
            "token_type" => token_type = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "error_description" => error_description = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(ApiError::AuthCallback(error_description.unwrap_or(error)));
    }
    match access_token.filter(|t| !t.is_empty()) {
        Some(access_token) => Ok(CallbackTokens {
            access_token,
            refresh_token,
            expires_in,
            token_type,
        }),
        None => Err(ApiError::AuthCallback(
            "no access token in callback".to_string(),
        )),
    }
}
