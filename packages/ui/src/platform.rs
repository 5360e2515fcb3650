//! Platform glue for the session and the browser.
//!
//! - **Web** (WASM + `web` feature): tokens live in `localStorage` via
//!   [`store::LocalStorageTokenStore`], navigation goes through `window.location`.
//! - **Desktop / Mobile / tests** (native): tokens live in memory via
//!   [`store::MemoryTokenStore`] and browser calls are logged no-ops.

use std::time::Duration;

use api::{ApiClient, Session};
use store::{CachePolicy, MarketConfig, QueryCache};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformTokens = store::LocalStorageTokenStore;
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub type PlatformTokens = store::MemoryTokenStore;

/// The session type every view works with.
pub type MarketSession = Session<ApiClient<PlatformTokens>, PlatformTokens>;

fn token_store(key: &str) -> PlatformTokens {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::LocalStorageTokenStore::new(key)
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        tracing::debug!("Keeping access token '{}' in memory", key);
        store::MemoryTokenStore::new()
    }
}

/// Build the session for `config`: token store, HTTP client and query cache.
pub fn make_session(config: &MarketConfig) -> MarketSession {
    let tokens = token_store(&config.auth.token_storage_key);
    let api = ApiClient::new(config.api.base_url.clone(), tokens.clone());
    let cache = QueryCache::new(CachePolicy::from(&config.cache));
    Session::new(api, tokens, cache)
}

/// The site root, e.g. `https://market.example.edu`.
pub fn origin() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        "http://localhost:8080".to_string()
    }
}

/// The current url fragment including the leading `#`, or empty.
pub fn location_hash() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|w| w.location().hash().ok())
            .unwrap_or_default()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        String::new()
    }
}

/// Send the browser to `url`, leaving the app.
pub fn redirect(url: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(url) {
                tracing::error!("Failed to redirect: {:?}", e);
            }
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        tracing::info!("Open {} in a browser to continue", url);
    }
}

pub async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}

/// Today's date in the member's timezone.
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
