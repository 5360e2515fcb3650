use dioxus::prelude::*;
use store::{filter_by_search, LostFoundItem, LostFoundKind};

use crate::cards::LostFoundCard;
use crate::listings::use_listings;
use crate::search_bar::SearchBar;
use crate::session::use_session;
use crate::views::ListStatus;

#[component]
pub fn LostFoundView() -> Element {
    let handle = use_session();
    let current_user_id = handle.user_id().unwrap_or_default();
    let mut listings = use_listings::<LostFoundItem>();
    let mut query = use_signal(String::new);
    let mut kind = use_signal(|| None::<LostFoundKind>);

    let selected = kind();
    let items: Vec<LostFoundItem> = filter_by_search(&listings.items.read(), &query())
        .into_iter()
        .filter(|item| selected.is_none_or(|k| item.kind == k))
        .collect();

    rsx! {
        section {
            class: "page",
            div {
                class: "page-header",
                h1 { "Lost & Found" }
                select {
                    class: "input",
                    onchange: move |evt| {
                        kind.set(match evt.value().as_str() {
                            "lost" => Some(LostFoundKind::Lost),
                            "found" => Some(LostFoundKind::Found),
                            _ => None,
                        })
                    },
                    option { value: "all", "All reports" }
                    option { value: "lost", "Lost" }
                    option { value: "found", "Found" }
                }
            }
            SearchBar {
                value: query(),
                placeholder: "Search by item or place",
                on_input: move |value| query.set(value),
            }
            ListStatus {
                loading: (listings.loading)(),
                error: (listings.error)(),
                count: items.len(),
                noun: "reports",
            }
            div {
                class: "card-grid",
                for item in items {
                    LostFoundCard {
                        key: "{item.id}",
                        item: item.clone(),
                        current_user_id: current_user_id.clone(),
                        on_deleted: move |_| listings.refresh(),
                    }
                }
            }
        }
    }
}
