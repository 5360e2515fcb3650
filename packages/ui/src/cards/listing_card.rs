use dioxus::prelude::*;
use store::{Giveaway, GiveawayStatus, Listing, Product, ProductStatus, Trip};

use crate::components::Badge;
use crate::format;

/// What a generic marketplace card shows, whatever the listing type.
#[derive(Clone, Debug, PartialEq)]
pub struct ListingSummary {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    /// Price, dates or pickup place, depending on the type.
    pub detail: String,
    pub status: Option<(String, &'static str)>,
    pub image_url: Option<String>,
}

impl From<&Product> for ListingSummary {
    fn from(product: &Product) -> Self {
        let tone = match product.status {
            ProductStatus::Active => "badge-success",
            ProductStatus::Sold => "badge-muted",
        };
        Self {
            id: product.id.clone(),
            owner_id: product.owner_id().to_string(),
            title: product.title.clone(),
            description: product.description.clone(),
            detail: format!(
                "{} · {} · {}",
                format::price(product.price),
                product.condition,
                product.category
            ),
            status: Some((product.status.label().to_string(), tone)),
            image_url: product.image_url.clone(),
        }
    }
}

impl From<&Trip> for ListingSummary {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id.clone(),
            owner_id: trip.owner_id().to_string(),
            title: trip.title.clone(),
            description: trip.description.clone(),
            detail: format!(
                "{} · {} to {} · {} · {} places",
                trip.destination,
                format::date(&trip.start_date),
                format::date(&trip.end_date),
                format::price(trip.price),
                trip.capacity
            ),
            status: None,
            image_url: None,
        }
    }
}

impl From<&Giveaway> for ListingSummary {
    fn from(giveaway: &Giveaway) -> Self {
        let tone = match giveaway.status {
            GiveawayStatus::Available => "badge-success",
            GiveawayStatus::Reserved => "badge-warning",
            GiveawayStatus::Claimed => "badge-muted",
        };
        Self {
            id: giveaway.id.clone(),
            owner_id: giveaway.owner_id().to_string(),
            title: giveaway.title.clone(),
            description: giveaway.description.clone(),
            detail: format!("{} · pick up at {}", giveaway.condition, giveaway.pickup_location),
            status: Some((giveaway.status.label().to_string(), tone)),
            image_url: None,
        }
    }
}

/// Card for products, trips and giveaways.
#[component]
pub fn ListingCard(summary: ListingSummary, #[props(default)] current_user_id: String) -> Element {
    let mine = !current_user_id.is_empty() && current_user_id == summary.owner_id;

    rsx! {
        article {
            class: "card listing-card",
            if let Some(src) = summary.image_url.as_ref() {
                img { class: "card-image", src: "{src}", alt: "{summary.title}" }
            }
            div {
                class: "card-body",
                div {
                    class: "card-badges",
                    if let Some((label, tone)) = summary.status.as_ref() {
                        Badge { label: label.clone(), tone: tone.to_string() }
                    }
                    if mine {
                        Badge { label: "Yours", tone: "badge-info" }
                    }
                }
                h3 { class: "card-title", "{summary.title}" }
                p { class: "card-text", "{summary.description}" }
                p { class: "card-meta", "{summary.detail}" }
            }
        }
    }
}
