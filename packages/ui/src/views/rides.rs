use dioxus::prelude::*;
use store::{filter_by_search, Ride};

use crate::cards::RideCard;
use crate::components::{Button, ButtonVariant};
use crate::listings::use_listings;
use crate::new_ride_dialog::NewRideDialog;
use crate::search_bar::SearchBar;
use crate::session::use_session;
use crate::views::{ListStatus, ModalOverlay};

/// Carpool board: every ride, searchable, with a form to offer one.
#[component]
pub fn RidesView() -> Element {
    let handle = use_session();
    let state = handle.state();
    let current_user_id = state.user_id().unwrap_or_default().to_string();
    let mut listings = use_listings::<Ride>();
    let mut query = use_signal(String::new);
    let mut creating = use_signal(|| false);

    let rides = filter_by_search(&listings.items.read(), &query());

    rsx! {
        section {
            class: "page",
            div {
                class: "page-header",
                h1 { "Rides" }
                if state.is_authenticated() {
                    Button {
                        variant: ButtonVariant::Primary,
                        onclick: move |_| creating.set(true),
                        "Offer a ride"
                    }
                }
            }
            SearchBar {
                value: query(),
                placeholder: "Search by place or notes",
                on_input: move |value| query.set(value),
            }
            if creating() {
                ModalOverlay {
                    on_close: move |_| creating.set(false),
                    NewRideDialog {
                        on_created: move |_| {
                            creating.set(false);
                            listings.refresh();
                        },
                        on_cancel: move |_| creating.set(false),
                    }
                }
            }
            ListStatus {
                loading: (listings.loading)(),
                error: (listings.error)(),
                count: rides.len(),
                noun: "rides",
            }
            div {
                class: "card-grid",
                for ride in rides {
                    RideCard {
                        key: "{ride.id}",
                        ride: ride.clone(),
                        current_user_id: current_user_id.clone(),
                        on_deleted: move |_| listings.refresh(),
                    }
                }
            }
        }
    }
}
