use dioxus::prelude::*;

use crate::icons::FaUser;
use crate::session::use_session;
use crate::Icon;

/// Top bar. Platform packages pass their router links as children.
#[component]
pub fn Navbar(children: Element) -> Element {
    rsx! {
        nav {
            class: "navbar",
            span { class: "navbar-brand", "Campus Market" }
            div { class: "navbar-links", {children} }
            UserBadge {}
        }
    }
}

/// Who is signed in, or nothing while the session resolves.
#[component]
fn UserBadge() -> Element {
    let state = use_session().state();

    match state.user {
        Some(user) => rsx! {
            span {
                class: "navbar-user",
                Icon { icon: FaUser, width: 12, height: 12 }
                " {user.display_name()}"
            }
        },
        None if state.is_loading => rsx! {
            span { class: "navbar-user muted", "..." }
        },
        None => rsx! {},
    }
}
