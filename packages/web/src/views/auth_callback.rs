//! Landing page for the auth provider's redirect.

use dioxus::prelude::*;
use ui::{push_toast, use_session, use_toasts, ToastLevel};

use crate::Route;

/// Reads the tokens from the url fragment, confirms them with the auth
/// provider, signs in and moves on.
#[component]
pub fn AuthCallback() -> Element {
    let handle = use_session();
    let nav = use_navigator();
    let mut toasts = use_toasts();
    let mut failure = use_signal(|| None::<String>);

    let _ = use_resource(move || {
        let handle = handle.clone();
        async move {
            let fragment = ui::platform::location_hash();
            let result = match api::auth::parse_callback(&fragment) {
                Ok(tokens) => handle.complete_sign_in(&tokens.access_token).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(Some(user)) => {
                    push_toast(
                        &mut toasts,
                        ToastLevel::Success,
                        format!("Welcome, {}", user.display_name()),
                    );
                    nav.replace(Route::Donations {});
                }
                Ok(None) => failure.set(Some("No session was returned".to_string())),
                Err(e) => {
                    push_toast(&mut toasts, ToastLevel::Error, e.to_string());
                    failure.set(Some(e.to_string()));
                }
            }
        }
    });

    rsx! {
        div {
            class: "login-container",
            {match failure() {
                None => rsx! { p { "Signing you in..." } },
                Some(message) => rsx! {
                    p { class: "form-error", role: "alert", "{message}" }
                    Link { to: Route::Login {}, "Back to sign in" }
                },
            }}
        }
    }
}
