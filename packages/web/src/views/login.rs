//! Login page view with OAuth buttons.

use api::OAuthProvider;
use dioxus::prelude::*;
use ui::{use_session, LoginButton};

use crate::Route;

/// Login page component.
#[component]
pub fn Login() -> Element {
    let state = use_session().state();
    let nav = use_navigator();

    // Already signed in
    if !state.is_loading && state.is_authenticated() {
        nav.replace(Route::Profile {});
    }

    rsx! {
        div {
            class: "login-container",

            h1 { "Campus Market" }
            p { "Sign in with your university account:" }

            div {
                class: "login-buttons",
                LoginButton { provider: OAuthProvider::Google, class: "login-btn google-btn" }
                LoginButton { provider: OAuthProvider::Azure, class: "login-btn azure-btn" }
                LoginButton { provider: OAuthProvider::Github, class: "login-btn github-btn" }
            }

            Link { to: Route::Donations {}, "Continue without signing in" }
        }
    }
}
