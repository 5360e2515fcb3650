//! Session context and hooks for the UI.
//!
//! [`SessionProvider`] owns the [`MarketSession`] for the app and subscribes to
//! its query cache. Every cache event bumps a revision signal, so components
//! that read session state through [`SessionHandle`] re-render when the
//! current user is loaded, refetched or removed.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use api::{ApiError, AuthClient, OAuthProvider, SessionState, User};
use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_brands_icons::{FaGithub, FaGoogle, FaMicrosoft};
use dioxus_free_icons::Icon;
use store::{MarketConfig, TokenStore};

use crate::platform::{self, MarketSession};
use crate::toast::{push_toast, use_toasts, ToastLevel};

const MAINTAIN_INTERVAL: Duration = Duration::from_secs(60);

/// The session plus the signal that tracks its cache.
#[derive(Clone)]
pub struct SessionHandle {
    session: MarketSession,
    auth: AuthClient,
    revision: Signal<u64>,
}

impl SessionHandle {
    pub fn session(&self) -> &MarketSession {
        &self.session
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// Current user and loading state. Subscribes the calling component to
    /// cache changes.
    pub fn state(&self) -> SessionState {
        let _ = self.revision.read();
        self.session.state()
    }

    pub fn user_id(&self) -> Option<String> {
        self.state().user.map(|u| u.id)
    }

    /// Check the callback token with the auth provider, then adopt it.
    pub async fn complete_sign_in(&self, access_token: &str) -> Result<Option<User>, ApiError> {
        self.session.sign_in(&self.auth, access_token).await
    }

    pub async fn refetch_user(&self) {
        if let Err(e) = self.session.refetch_user().await {
            tracing::warn!("Failed to refresh user: {}", e);
        }
    }

    /// Revoke the token on the auth provider (best effort) and clear the
    /// local session.
    pub async fn sign_out(&self) {
        if let Some(token) = self.session.tokens().load() {
            if let Err(e) = self.auth.sign_out(&token).await {
                tracing::warn!("Auth provider sign-out failed: {}", e);
            }
        }
        self.session.logout();
    }
}

/// Get the session handle provided by [`SessionProvider`].
pub fn use_session() -> SessionHandle {
    use_context::<SessionHandle>()
}

/// Like [`use_session`], but also revalidates the current user when the
/// calling component mounts. A fresh cached user costs no request.
pub fn use_current_user() -> SessionHandle {
    let handle = use_session();
    let loader = handle.clone();
    let _ = use_resource(move || {
        let loader = loader.clone();
        async move {
            if let Err(e) = loader.session().load_user().await {
                tracing::warn!("Failed to load user: {}", e);
            }
        }
    });
    handle
}

/// Provider component that owns the session.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn SessionProvider(config: MarketConfig, children: Element) -> Element {
    let revision = use_signal(|| 0u64);

    let handle = use_context_provider(|| SessionHandle {
        session: platform::make_session(&config),
        auth: AuthClient::new(config.auth.clone()),
        revision,
    });

    // The listener only touches the signal, so the cache never holds the session.
    let subscription = use_hook(|| {
        let subscription = handle.session().cache().subscribe(move |event| {
            tracing::trace!("Cache event {:?}", event);
            let mut revision = revision;
            *revision.write() += 1;
        });
        Rc::new(RefCell::new(Some(subscription)))
    });

    let cache = handle.session().cache().clone();
    use_drop(move || {
        if let Some(subscription) = subscription.borrow_mut().take() {
            cache.unsubscribe(subscription);
        }
    });

    // Resolve the stored token on mount
    let loader = handle.clone();
    let _ = use_resource(move || {
        let loader = loader.clone();
        async move {
            if let Err(e) = loader.session().load_user().await {
                tracing::warn!("Failed to load user: {}", e);
            }
        }
    });

    // Periodically evict expired entries and revalidate a stale user
    let collector = handle.clone();
    use_effect(move || {
        let collector = collector.clone();
        spawn(async move {
            loop {
                platform::sleep(MAINTAIN_INTERVAL).await;
                match collector.session().maintain().await {
                    Ok(evicted) if evicted > 0 => {
                        tracing::debug!("Evicted {} expired cache entries", evicted);
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Failed to refresh user: {}", e),
                }
            }
        });
    });

    rsx! {
        {children}
    }
}

/// Button that sends the browser to the auth provider.
#[component]
pub fn LoginButton(
    provider: OAuthProvider,
    #[props(default)] label: Option<String>,
    #[props(default)] class: String,
) -> Element {
    let handle = use_session();
    let mut toasts = use_toasts();
    let mut loading = use_signal(|| false);
    let label = label.unwrap_or_else(|| format!("Continue with {}", provider.label()));

    let onclick = move |_| {
        loading.set(true);
        match handle.auth().authorize_url(provider, &platform::origin()) {
            Ok(url) => platform::redirect(url.as_str()),
            Err(e) => {
                loading.set(false);
                push_toast(&mut toasts, ToastLevel::Error, format!("Could not start sign-in: {e}"));
            }
        }
    };

    rsx! {
        button {
            class: "{class}",
            disabled: loading(),
            onclick,
            {provider_icon(provider)}
            if loading() {
                "Redirecting..."
            } else {
                "{label}"
            }
        }
    }
}

fn provider_icon(provider: OAuthProvider) -> Element {
    match provider {
        OAuthProvider::Google => rsx! { Icon { icon: FaGoogle, width: 14, height: 14 } },
        OAuthProvider::Github => rsx! { Icon { icon: FaGithub, width: 14, height: 14 } },
        OAuthProvider::Azure => rsx! { Icon { icon: FaMicrosoft, width: 14, height: 14 } },
    }
}

/// Button to sign out.
#[component]
pub fn LogoutButton(
    #[props(default)] class: String,
    on_logout: Option<EventHandler<()>>,
) -> Element {
    let handle = use_session();
    let mut toasts = use_toasts();
    let mut loading = use_signal(|| false);

    let onclick = move |_| {
        let handle = handle.clone();
        async move {
            loading.set(true);
            handle.sign_out().await;
            loading.set(false);
            push_toast(&mut toasts, ToastLevel::Info, "Signed out");
            if let Some(on_logout) = on_logout {
                on_logout.call(());
            }
        }
    };

    rsx! {
        button {
            class: "{class}",
            disabled: loading(),
            onclick,
            "Sign out"
        }
    }
}
