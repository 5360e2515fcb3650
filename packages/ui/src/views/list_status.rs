use dioxus::prelude::*;

/// Placeholder shown instead of a card grid: loading, failed or empty.
/// Renders nothing once there are items to show.
#[component]
pub fn ListStatus(
    loading: bool,
    #[props(!optional)] error: Option<String>,
    count: usize,
    noun: String,
) -> Element {
    if count > 0 {
        return rsx! {};
    }
    if loading {
        return rsx! {
            p { class: "list-status", "Loading {noun}..." }
        };
    }
    match error {
        Some(error) => rsx! {
            p { class: "list-status form-error", role: "alert", "Could not load {noun}: {error}" }
        },
        None => rsx! {
            p { class: "list-status", "No {noun} yet." }
        },
    }
}
