use dioxus::prelude::*;
use store::{is_owner, Ride};

use crate::confirm_dialog::OwnerActions;
use crate::format;
use crate::icons::{FaArrowRight, FaCarSide};
use crate::listings::delete_listing;
use crate::session::use_session;
use crate::toast::use_toasts;
use crate::Icon;

/// A carpool offer. The driver also gets a delete control.
#[component]
pub fn RideCard(
    ride: Ride,
    #[props(default)] current_user_id: String,
    on_deleted: EventHandler<String>,
) -> Element {
    let owner = is_owner(Some(current_user_id.as_str()), &ride);
    let departure = format::departure(&ride.departure_time);
    let price = format::price(ride.price);
    let seats = match ride.seats_available {
        0 => "Full".to_string(),
        1 => "1 seat left".to_string(),
        n => format!("{n} seats left"),
    };

    rsx! {
        article {
            class: "card ride-card",
            div {
                class: "card-body",
                div {
                    class: "ride-route",
                    Icon { icon: FaCarSide, width: 16, height: 16 }
                    span { "{ride.origin}" }
                    Icon { icon: FaArrowRight, width: 12, height: 12 }
                    span { "{ride.destination}" }
                }
                div {
                    class: "card-meta",
                    span { "{departure}" }
                    span { "{seats}" }
                    span { class: "price", "{price}" }
                }
                if let Some(driver) = ride.driver_name.as_ref() {
                    p { class: "card-subtle", "Driver: {driver}" }
                }
                if let Some(notes) = ride.notes.as_ref() {
                    p { class: "card-text", "{notes}" }
                }
            }
            if owner {
                RideOwnerControls { ride: ride.clone(), on_deleted }
            }
        }
    }
}

#[component]
fn RideOwnerControls(ride: Ride, on_deleted: EventHandler<String>) -> Element {
    let handle = use_session();
    let toasts = use_toasts();
    let busy = use_signal(|| false);

    rsx! {
        OwnerActions {
            noun: "ride",
            busy: busy(),
            on_delete: move |_| {
                delete_listing(handle.clone(), toasts, busy, ride.clone(), on_deleted);
            },
        }
    }
}
