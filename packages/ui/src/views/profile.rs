use api::{OAuthProvider, ProfileDialog, ProfileForm};
use dioxus::prelude::*;

use crate::components::{Button, ButtonVariant};
use crate::edit_profile_dialog::EditProfileDialog;
use crate::session::{use_current_user, LoginButton, LogoutButton};

/// The signed-in member's profile with edit and sign-out actions.
#[component]
pub fn ProfileView(on_logout: Option<EventHandler<()>>) -> Element {
    let handle = use_current_user();
    let state = handle.state();
    let mut dialog = use_signal(ProfileDialog::default);

    if state.is_loading && state.user.is_none() {
        return rsx! {
            p { class: "list-status", "Loading profile..." }
        };
    }

    let Some(user) = state.user else {
        let retry = handle.clone();
        return rsx! {
            section {
                class: "page profile",
                if let Some(error) = state.error.as_ref() {
                    p { class: "form-error", role: "alert", "Could not load your profile: {error}" }
                    Button {
                        variant: ButtonVariant::Outline,
                        onclick: move |_| {
                            let retry = retry.clone();
                            spawn(async move { retry.refetch_user().await });
                        },
                        "Try again"
                    }
                }
                p { "Sign in to see your profile." }
                LoginButton { provider: OAuthProvider::Google, class: "btn btn-primary" }
            }
        };
    };

    let editing_user = user.clone();

    rsx! {
        section {
            class: "page profile",
            div {
                class: "profile-header",
                if let Some(src) = user.avatar_url.as_ref() {
                    img { class: "avatar", src: "{src}", alt: "{user.display_name()}" }
                }
                div {
                    h1 { "{user.display_name()}" }
                    p { class: "card-subtle", "{user.email}" }
                }
            }
            dl {
                class: "profile-fields",
                dt { "Username" }
                dd { "{user.username}" }
                dt { "Department" }
                dd { "{user.department}" }
            }
            div {
                class: "profile-actions",
                Button {
                    variant: ButtonVariant::Primary,
                    onclick: move |_| {
                        // First open seeds the form; later opens keep unsaved edits
                        if dialog.peek().form == ProfileForm::default() {
                            dialog.set(ProfileDialog::open_for(&editing_user));
                        } else {
                            dialog.write().reopen();
                        }
                    },
                    "Edit profile"
                }
                LogoutButton {
                    class: "btn btn-outline",
                    on_logout: move |_| {
                        if let Some(on_logout) = on_logout {
                            on_logout.call(());
                        }
                    },
                }
            }
            EditProfileDialog {
                dialog,
                on_saved: move |saved: api::User| {
                    tracing::info!("Profile saved for {}", saved.id);
                },
            }
        }
    }
}
