use chrono::NaiveDate;
use dioxus::prelude::*;
use store::{is_owner, Deadline, Donation};

use crate::confirm_dialog::OwnerActions;
use crate::format;
use crate::listings::delete_listing;
use crate::platform;
use crate::session::use_session;
use crate::toast::use_toasts;

/// A fundraising campaign with its progress bar and time left.
#[component]
pub fn DonationCard(
    donation: Donation,
    /// Signed-in member, empty when anonymous.
    #[props(default)]
    current_user_id: String,
    /// Date to count remaining days from; defaults to the local date.
    #[props(default)]
    today: Option<NaiveDate>,
    on_select: Option<EventHandler<String>>,
    on_deleted: Option<EventHandler<String>>,
) -> Element {
    let today = today.unwrap_or_else(platform::today);
    let deadline = donation.deadline(today);
    let progress = donation.progress();
    let raised = format::money(donation.raised_amount);
    let goal = format::money(donation.goal_amount);
    let owner = is_owner(Some(current_user_id.as_str()), &donation);
    let id = donation.id.clone();

    rsx! {
        article {
            class: "card donation-card",
            if let Some(src) = donation.image_url.as_ref() {
                img { class: "card-image", src: "{src}", alt: "{donation.title}" }
            }
            div {
                class: "card-body",
                if let Some(category) = donation.category.as_ref() {
                    span { class: "card-eyebrow", "{category}" }
                }
                h3 {
                    class: "card-title",
                    onclick: move |_| {
                        if let Some(on_select) = on_select {
                            on_select.call(id.clone());
                        }
                    },
                    "{donation.title}"
                }
                p { class: "card-text", "{donation.description}" }
                div {
                    class: "progress",
                    div {
                        class: "progress-bar",
                        style: "width: {progress}%",
                    }
                }
                div {
                    class: "card-meta",
                    span { "{raised} raised of {goal}" }
                    span {
                        class: if deadline == Deadline::Ended { "deadline ended" } else { "deadline" },
                        "{deadline}"
                    }
                }
            }
            if owner {
                DonationOwnerControls {
                    donation: donation.clone(),
                    on_deleted: move |id| {
                        if let Some(on_deleted) = on_deleted {
                            on_deleted.call(id);
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn DonationOwnerControls(donation: Donation, on_deleted: EventHandler<String>) -> Element {
    let handle = use_session();
    let toasts = use_toasts();
    let busy = use_signal(|| false);

    rsx! {
        OwnerActions {
            noun: "donation",
            busy: busy(),
            on_delete: move |_| {
                delete_listing(handle.clone(), toasts, busy, donation.clone(), on_deleted);
            },
        }
    }
}
