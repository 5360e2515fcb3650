use dioxus::prelude::*;

use crate::components::{Button, ButtonVariant};
use crate::views::ModalOverlay;

/// Asks before a destructive action. Both buttons are disabled while `busy`.
#[component]
pub fn ConfirmDialog(
    title: String,
    message: String,
    #[props(default = "Delete".to_string())] confirm_label: String,
    #[props(default)] busy: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        ModalOverlay {
            on_close: move |_| {
                if !busy {
                    on_cancel.call(());
                }
            },
            div {
                class: "dialog-body",
                h2 { class: "dialog-title", "{title}" }
                p { class: "dialog-message", "{message}" }
                div {
                    class: "dialog-actions",
                    Button {
                        variant: ButtonVariant::Outline,
                        disabled: busy,
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    Button {
                        variant: ButtonVariant::Destructive,
                        disabled: busy,
                        onclick: move |_| on_confirm.call(()),
                        if busy { "Working..." } else { "{confirm_label}" }
                    }
                }
            }
        }
    }
}

/// Delete button with a confirmation step, shown only to a listing's owner.
#[component]
pub fn OwnerActions(noun: String, busy: bool, on_delete: EventHandler<()>) -> Element {
    let mut confirming = use_signal(|| false);

    rsx! {
        div {
            class: "owner-actions",
            Button {
                variant: ButtonVariant::Ghost,
                class: "delete-button",
                title: "Delete {noun}",
                disabled: busy,
                onclick: move |_| confirming.set(true),
                "Delete"
            }
            if confirming() {
                ConfirmDialog {
                    title: "Delete {noun}?",
                    message: "This cannot be undone.",
                    busy,
                    on_confirm: move |_| {
                        confirming.set(false);
                        on_delete.call(());
                    },
                    on_cancel: move |_| confirming.set(false),
                }
            }
        }
    }
}
