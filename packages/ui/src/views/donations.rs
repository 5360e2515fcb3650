use dioxus::prelude::*;
use store::{filter_by_search, Donation};

use crate::cards::DonationCard;
use crate::listings::use_listings;
use crate::search_bar::SearchBar;
use crate::session::use_session;
use crate::views::ListStatus;

#[component]
pub fn DonationsView(on_select: EventHandler<String>) -> Element {
    let handle = use_session();
    let current_user_id = handle.user_id().unwrap_or_default();
    let mut listings = use_listings::<Donation>();
    let mut query = use_signal(String::new);

    let donations = filter_by_search(&listings.items.read(), &query());

    rsx! {
        section {
            class: "page",
            div {
                class: "page-header",
                h1 { "Donations" }
            }
            SearchBar {
                value: query(),
                placeholder: "Search campaigns",
                on_input: move |value| query.set(value),
            }
            ListStatus {
                loading: (listings.loading)(),
                error: (listings.error)(),
                count: donations.len(),
                noun: "campaigns",
            }
            div {
                class: "card-grid",
                for donation in donations {
                    DonationCard {
                        key: "{donation.id}",
                        donation: donation.clone(),
                        current_user_id: current_user_id.clone(),
                        on_select,
                        on_deleted: move |_| listings.refresh(),
                    }
                }
            }
        }
    }
}

/// One campaign, loaded by id. Remount (e.g. key by id) to switch campaigns.
#[component]
pub fn DonationDetailView(id: String, on_deleted: EventHandler<String>) -> Element {
    let handle = use_session();
    let current_user_id = handle.user_id().unwrap_or_default();

    let loader = handle.clone();
    let donation = use_resource(move || {
        let loader = loader.clone();
        let id = id.clone();
        async move {
            loader
                .session()
                .listing::<Donation>(&id)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to load donation {}: {}", id, e);
                    e.to_string()
                })
        }
    });

    match donation.cloned() {
        None => rsx! {
            p { class: "list-status", "Loading campaign..." }
        },
        Some(Err(error)) => rsx! {
            p { class: "list-status form-error", role: "alert", "Could not load campaign: {error}" }
        },
        Some(Ok(donation)) => rsx! {
            section {
                class: "page donation-detail",
                DonationCard { donation, current_user_id, on_deleted }
            }
        },
    }
}
