use api::{submit_profile, ProfileDialog, User};
use dioxus::prelude::*;

use crate::components::{Button, ButtonVariant, Input, Label};
use crate::session::use_session;
use crate::toast::{push_toast, use_toasts, ToastLevel};
use crate::views::ModalOverlay;

/// Modal form for editing username and department.
///
/// The parent owns `dialog`, so closing without saving keeps what was typed
/// until the parent itself is remounted.
#[component]
pub fn EditProfileDialog(dialog: Signal<ProfileDialog>, on_saved: EventHandler<User>) -> Element {
    let handle = use_session();
    let mut toasts = use_toasts();
    let mut dialog = dialog;

    if !dialog().open {
        return rsx! {};
    }

    let state = dialog();

    let handle_submit = move |_| {
        let begin = dialog.write().begin_submit();
        let update = match begin {
            Ok(update) => update,
            Err(e) => {
                dialog.write().error = Some(e.to_string());
                return;
            }
        };
        let handle = handle.clone();
        spawn(async move {
            let result = submit_profile(handle.session(), &update).await;
            dialog.write().finish(&result);
            match result {
                Ok(user) => {
                    push_toast(&mut toasts, ToastLevel::Success, "Profile updated");
                    on_saved.call(user);
                }
                Err(e) => {
                    push_toast(
                        &mut toasts,
                        ToastLevel::Error,
                        format!("Failed to update profile: {e}"),
                    );
                }
            }
        });
    };

    rsx! {
        ModalOverlay {
            on_close: move |_| dialog.write().cancel(),
            div {
                class: "dialog-body",
                h2 { class: "dialog-title", "Edit profile" }

                div {
                    class: "form-field",
                    Label { html_for: "profile-email", "Email" }
                    Input {
                        id: "profile-email",
                        input_type: "email",
                        value: state.form.email.clone(),
                        readonly: true,
                        disabled: true,
                    }
                }

                div {
                    class: "form-field",
                    Label { html_for: "profile-username", "Username" }
                    Input {
                        id: "profile-username",
                        value: state.form.username.clone(),
                        placeholder: "3 to 50 characters",
                        disabled: state.submitting,
                        oninput: move |evt: FormEvent| dialog.write().set_username(evt.value()),
                    }
                }

                div {
                    class: "form-field",
                    Label { html_for: "profile-department", "Department" }
                    Input {
                        id: "profile-department",
                        value: state.form.department.clone(),
                        placeholder: "e.g. Computer Science",
                        disabled: state.submitting,
                        oninput: move |evt: FormEvent| dialog.write().set_department(evt.value()),
                    }
                }

                if let Some(error) = state.error.as_ref() {
                    p { class: "form-error", role: "alert", "{error}" }
                }

                div {
                    class: "dialog-actions",
                    Button {
                        variant: ButtonVariant::Outline,
                        disabled: state.submitting,
                        onclick: move |_| dialog.write().cancel(),
                        "Cancel"
                    }
                    Button {
                        variant: ButtonVariant::Primary,
                        disabled: !state.can_submit(),
                        onclick: handle_submit,
                        if state.submitting { "Saving..." } else { "Save" }
                    }
                }
            }
        }
    }
}
