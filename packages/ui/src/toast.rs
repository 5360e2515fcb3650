use std::time::Duration;

use dioxus::prelude::*;

use crate::platform;

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

impl ToastLevel {
    fn class(self) -> &'static str {
        match self {
            ToastLevel::Info => "toast info",
            ToastLevel::Success => "toast success",
            ToastLevel::Error => "toast error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
}

/// Notifications currently on screen, oldest first.
#[derive(Clone, Debug, Default)]
pub struct Toasts {
    pub entries: Vec<Toast>,
    next_id: u64,
}

impl Toasts {
    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Toast {
            id,
            level,
            message: message.into(),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.entries.retain(|t| t.id != id);
    }
}

pub fn use_toasts() -> Signal<Toasts> {
    use_context::<Signal<Toasts>>()
}

/// Show a notification that disappears on its own after a few seconds.
pub fn push_toast(toasts: &mut Signal<Toasts>, level: ToastLevel, message: impl Into<String>) {
    let message = message.into();
    if level == ToastLevel::Error {
        tracing::error!("{}", message);
    }
    let id = toasts.write().push(level, message);
    let mut toasts = *toasts;
    spawn(async move {
        platform::sleep(TOAST_TTL).await;
        toasts.write().dismiss(id);
    });
}

/// Provides the toast signal to `children` and renders the stack above them.
#[component]
pub fn ToastProvider(children: Element) -> Element {
    let toasts = use_context_provider(|| Signal::new(Toasts::default()));

    rsx! {
        {children}
        ToastHost { toasts }
    }
}

#[component]
fn ToastHost(toasts: Signal<Toasts>) -> Element {
    let mut toasts = toasts;
    let entries = toasts().entries;

    rsx! {
        div {
            class: "toast-stack",
            for toast in entries {
                div {
                    key: "{toast.id}",
                    class: toast.level.class(),
                    role: "status",
                    span { "{toast.message}" }
                    button {
                        class: "toast-close",
                        onclick: move |_| toasts.write().dismiss(toast.id),
                        "×"
                    }
                }
            }
        }
    }
}
