use dioxus::prelude::*;
use store::{is_owner, LostFoundItem, LostFoundKind, LostFoundStatus};

use crate::components::Badge;
use crate::confirm_dialog::OwnerActions;
use crate::format;
use crate::listings::delete_listing;
use crate::session::use_session;
use crate::toast::use_toasts;

#[component]
pub fn LostFoundCard(
    item: LostFoundItem,
    #[props(default)] current_user_id: String,
    on_deleted: EventHandler<String>,
) -> Element {
    let owner = is_owner(Some(current_user_id.as_str()), &item);
    let kind_tone = match item.kind {
        LostFoundKind::Lost => "badge-warning",
        LostFoundKind::Found => "badge-info",
    };
    let status_tone = match item.status {
        LostFoundStatus::Open => "badge-success",
        LostFoundStatus::Claimed | LostFoundStatus::Resolved => "badge-muted",
    };
    let date = format::date(&item.date);

    rsx! {
        article {
            class: "card lost-found-card",
            if let Some(src) = item.image_url.as_ref() {
                img { class: "card-image", src: "{src}", alt: "{item.title}" }
            }
            div {
                class: "card-body",
                div {
                    class: "card-badges",
                    Badge { label: item.kind.label().to_string(), tone: kind_tone.to_string() }
                    Badge { label: item.status.label().to_string(), tone: status_tone.to_string() }
                }
                h3 { class: "card-title", "{item.title}" }
                p { class: "card-text", "{item.description}" }
                div {
                    class: "card-meta",
                    span { "{item.location}" }
                    span { "{date}" }
                }
                if let Some(contact) = item.contact.as_ref() {
                    p { class: "card-subtle", "Contact: {contact}" }
                }
            }
            if owner {
                LostFoundOwnerControls { item: item.clone(), on_deleted }
            }
        }
    }
}

#[component]
fn LostFoundOwnerControls(item: LostFoundItem, on_deleted: EventHandler<String>) -> Element {
    let handle = use_session();
    let toasts = use_toasts();
    let busy = use_signal(|| false);

    rsx! {
        OwnerActions {
            noun: "report",
            busy: busy(),
            on_delete: move |_| {
                delete_listing(handle.clone(), toasts, busy, item.clone(), on_deleted);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn item() -> LostFoundItem {
        LostFoundItem {
            id: "l1".to_string(),
            title: "Blue umbrella".to_string(),
            description: "Left in lecture hall B".to_string(),
            kind: LostFoundKind::Found,
            location: "Hall B".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            status: LostFoundStatus::Claimed,
            contact: None,
            image_url: None,
            user_id: "finder".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    fn app() -> Element {
        rsx! {
            LostFoundCard { item: item(), current_user_id: "visitor", on_deleted: move |_| {} }
        }
    }

    #[test]
    fn test_badges_and_no_owner_controls() {
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
        let html = dioxus_ssr::render(&dom);
        assert!(html.contains("Found"));
        assert!(html.contains("Claimed"));
        assert!(html.contains("17 Oct 2026"));
        assert!(!html.contains("delete-button"));
    }
}
