//! Route targets. Each one wires a shared view from `ui` to the router.

use dioxus::prelude::*;
use ui::views::{
    DonationDetailView, DonationsView, GiveawaysView, LostFoundView, ProductsView, ProfileView,
    RidesView, TripsView,
};

use crate::Route;

#[component]
pub fn Donations() -> Element {
    let nav = use_navigator();
    rsx! {
        DonationsView {
            on_select: move |id| {
                nav.push(Route::DonationDetail { id });
            },
        }
    }
}

#[component]
pub fn DonationDetail(id: String) -> Element {
    let nav = use_navigator();
    rsx! {
        DonationDetailView {
            key: "{id}",
            id: id.clone(),
            on_deleted: move |_| {
                nav.replace(Route::Donations {});
            },
        }
    }
}

#[component]
pub fn Rides() -> Element {
    rsx! { RidesView {} }
}

#[component]
pub fn LostFound() -> Element {
    rsx! { LostFoundView {} }
}

#[component]
pub fn Marketplace() -> Element {
    rsx! { ProductsView {} }
}

#[component]
pub fn Trips() -> Element {
    rsx! { TripsView {} }
}

#[component]
pub fn Giveaways() -> Element {
    rsx! { GiveawaysView {} }
}

#[component]
pub fn Profile() -> Element {
    let nav = use_navigator();
    rsx! {
        ProfileView {
            on_logout: move |_| {
                nav.replace(Route::Login {});
            },
        }
    }
}
