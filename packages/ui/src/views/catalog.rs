use dioxus::prelude::*;
use store::{filter_by_search, Giveaway, Product, Resource, Trip};

use crate::cards::{ListingCard, ListingSummary};
use crate::listings::use_listings;
use crate::search_bar::SearchBar;
use crate::session::use_session;
use crate::views::ListStatus;

/// Searchable grid of read-only listing cards for collection `R`.
fn catalog<R>(title: &str, noun: &str) -> Element
where
    R: Resource,
    for<'a> ListingSummary: From<&'a R>,
{
    let handle = use_session();
    let current_user_id = handle.user_id().unwrap_or_default();
    let listings = use_listings::<R>();
    let mut query = use_signal(String::new);

    let summaries: Vec<ListingSummary> = filter_by_search(&listings.items.read(), &query())
        .iter()
        .map(ListingSummary::from)
        .collect();

    rsx! {
        section {
            class: "page",
            div {
                class: "page-header",
                h1 { "{title}" }
            }
            SearchBar {
                value: query(),
                placeholder: "Search {noun}",
                on_input: move |value| query.set(value),
            }
            ListStatus {
                loading: (listings.loading)(),
                error: (listings.error)(),
                count: summaries.len(),
                noun: noun.to_string(),
            }
            div {
                class: "card-grid",
                for summary in summaries {
                    ListingCard {
                        key: "{summary.id}",
                        summary: summary.clone(),
                        current_user_id: current_user_id.clone(),
                    }
                }
            }
        }
    }
}

#[component]
pub fn ProductsView() -> Element {
    catalog::<Product>("Marketplace", "products")
}

#[component]
pub fn TripsView() -> Element {
    catalog::<Trip>("Trips", "trips")
}

#[component]
pub fn GiveawaysView() -> Element {
    catalog::<Giveaway>("Giveaways", "giveaways")
}
