//! # Listings: shared behaviour of user-created catalog entries
//!
//! Every entity a member can post (donation, ride, lost-found item, trip,
//! giveaway, product) implements [`Listing`], which exposes the owner and the
//! searchable text. [`Resource`] adds the REST collection path and the draft
//! type used when creating one.
//!
//! The helpers here are the derivations the cards display:
//!
//! - [`is_owner`]: gates edit/delete controls.
//! - [`days_left`] / [`Deadline`]: "Ended" or "`N`d left" for donations.
//! - [`progress_percent`]: donation progress bar width, clamped to 0..=100.
//! - [`filter_by_search`]: case-insensitive search used by list views.

use std::fmt;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{
    Donation, Giveaway, LostFoundItem, NewDonation, NewGiveaway, NewLostFoundItem, NewProduct,
    NewRide, NewTrip, Product, Ride, Trip,
};

/// A user-created catalog entry.
pub trait Listing {
    fn id(&self) -> &str;

    /// The user that created the entry and may mutate it.
    fn owner_id(&self) -> &str;

    fn title(&self) -> &str;

    /// Text fields matched by [`filter_by_search`].
    fn search_fields(&self) -> Vec<&str>;

    /// Whether every whitespace-separated term in `query` occurs in one of the
    /// search fields, ignoring case. A blank query matches everything.
    fn matches(&self, query: &str) -> bool {
        let fields: Vec<String> = self
            .search_fields()
            .into_iter()
            .map(str::to_lowercase)
            .collect();
        query
            .split_whitespace()
            .map(str::to_lowercase)
            .all(|term| fields.iter().any(|f| f.contains(&term)))
    }
}

/// A listing backed by a REST collection, e.g. `/rides`.
pub trait Resource: Listing + Clone + Serialize + DeserializeOwned + 'static {
    /// Collection path relative to the API base url.
    const PATH: &'static str;
    /// Human-readable singular name for notifications.
    const NAME: &'static str;
    /// Body posted to create a new entry.
    type Draft: Serialize;
}

/// Whether `current_user_id` owns `listing`. Anonymous visitors own nothing.
pub fn is_owner<L: Listing + ?Sized>(current_user_id: Option<&str>, listing: &L) -> bool {
    current_user_id.is_some_and(|id| !id.is_empty() && id == listing.owner_id())
}

/// Listings whose text matches `query`, in their original order.
pub fn filter_by_search<L: Listing + Clone>(items: &[L], query: &str) -> Vec<L> {
    items.iter().filter(|item| item.matches(query)).cloned().collect()
}

/// Time remaining before a donation closes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deadline {
    Ended,
    DaysLeft(i64),
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deadline::Ended => f.write_str("Ended"),
            Deadline::DaysLeft(days) => write!(f, "{days}d left"),
        }
    }
}

/// Whole days from `today` until `end_date`. A campaign ending today has ended.
pub fn days_left(end_date: NaiveDate, today: NaiveDate) -> Deadline {
    let days = (end_date - today).num_days();
    if days > 0 {
        Deadline::DaysLeft(days)
    } else {
        Deadline::Ended
    }
}

/// `min(raised / goal * 100, 100)`, with non-positive goals and negative
/// amounts reported as 0.
pub fn progress_percent(raised: f64, goal: f64) -> f64 {
    if goal <= 0.0 || !goal.is_finite() || !raised.is_finite() {
        return 0.0;
    }
    (raised / goal * 100.0).clamp(0.0, 100.0)
}

impl Donation {
    pub fn deadline(&self, today: NaiveDate) -> Deadline {
        days_left(self.end_date, today)
    }

    pub fn progress(&self) -> f64 {
        progress_percent(self.raised_amount, self.goal_amount)
    }
}

impl Listing for Donation {
    fn id(&self) -> &str {
        &self.id
    }
    fn owner_id(&self) -> &str {
        &self.user_id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str()];
        fields.extend(self.category.as_deref());
        fields
    }
}

impl Resource for Donation {
    const PATH: &'static str = "/donations";
    const NAME: &'static str = "donation";
    type Draft = NewDonation;
}

impl Listing for Ride {
    fn id(&self) -> &str {
        &self.id
    }
    fn owner_id(&self) -> &str {
        &self.driver_id
    }
    fn title(&self) -> &str {
        &self.destination
    }
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.origin.as_str(), self.destination.as_str()];
        fields.extend(self.notes.as_deref());
        fields.extend(self.driver_name.as_deref());
        fields
    }
}

impl Resource for Ride {
    const PATH: &'static str = "/rides";
    const NAME: &'static str = "ride";
    type Draft = NewRide;
}

impl Listing for LostFoundItem {
    fn id(&self) -> &str {
        &self.id
    }
    fn owner_id(&self) -> &str {
        &self.user_id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.description.as_str(),
            self.location.as_str(),
            self.kind.label(),
        ]
    }
}

impl Resource for LostFoundItem {
    const PATH: &'static str = "/lost-found";
    const NAME: &'static str = "item";
    type Draft = NewLostFoundItem;
}

impl Listing for Trip {
    fn id(&self) -> &str {
        &self.id
    }
    fn owner_id(&self) -> &str {
        &self.organizer_id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.description.as_str(),
            self.destination.as_str(),
        ]
    }
}

impl Resource for Trip {
    const PATH: &'static str = "/trips";
    const NAME: &'static str = "trip";
    type Draft = NewTrip;
}

impl Listing for Giveaway {
    fn id(&self) -> &str {
        &self.id
    }
    fn owner_id(&self) -> &str {
        &self.user_id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.description.as_str(),
            self.pickup_location.as_str(),
        ]
    }
}

impl Resource for Giveaway {
    const PATH: &'static str = "/giveaways";
    const NAME: &'static str = "giveaway";
    type Draft = NewGiveaway;
}

impl Listing for Product {
    fn id(&self) -> &str {
        &self.id
    }
    fn owner_id(&self) -> &str {
        &self.seller_id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.description.as_str(),
            self.category.as_str(),
        ]
    }
}

impl Resource for Product {
    const PATH: &'static str = "/products";
    const NAME: &'static str = "product";
    type Draft = NewProduct;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn donation(end_in_days: i64, raised: f64, goal: f64) -> Donation {
        Donation {
            id: "d1".to_string(),
            title: "Library books".to_string(),
            description: "Buy textbooks for first-years".to_string(),
            goal_amount: goal,
            raised_amount: raised,
            end_date: today() + Duration::days(end_in_days),
            category: Some("Education".to_string()),
            image_url: None,
            user_id: "owner".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    fn ride(driver: &str, destination: &str) -> Ride {
        Ride {
            id: format!("ride-{destination}"),
            origin: "Main Campus".to_string(),
            destination: destination.to_string(),
            departure_time: Utc.with_ymd_and_hms(2026, 10, 20, 8, 0, 0).unwrap(),
            seats_available: 2,
            price: 5.0,
            notes: Some("Leaving from gate B".to_string()),
            driver_id: driver.to_string(),
            driver_name: None,
            created_at: Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn test_days_left_future_and_past() {
        assert_eq!(donation(5, 0.0, 100.0).deadline(today()), Deadline::DaysLeft(5));
        assert_eq!(donation(5, 0.0, 100.0).deadline(today()).to_string(), "5d left");
        assert_eq!(donation(-1, 0.0, 100.0).deadline(today()), Deadline::Ended);
        assert_eq!(donation(-30, 0.0, 100.0).deadline(today()).to_string(), "Ended");
    }

    #[test]
    fn test_days_left_ending_today_is_ended() {
        assert_eq!(days_left(today(), today()), Deadline::Ended);
        assert_eq!(
            days_left(today() + Duration::days(1), today()),
            Deadline::DaysLeft(1)
        );
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(progress_percent(25.0, 100.0), 25.0);
        assert_eq!(progress_percent(250.0, 100.0), 100.0);
        assert_eq!(progress_percent(100.0, 100.0), 100.0);
        assert_eq!(progress_percent(-5.0, 100.0), 0.0);
    }

    #[test]
    fn test_progress_with_zero_goal() {
        assert_eq!(progress_percent(50.0, 0.0), 0.0);
        assert_eq!(donation(3, 50.0, 0.0).progress(), 0.0);
    }

    #[test]
    fn test_is_owner() {
        let r = ride("driver-1", "Airport");
        assert!(is_owner(Some("driver-1"), &r));
        assert!(!is_owner(Some("someone-else"), &r));
        assert!(!is_owner(None, &r));
        assert!(!is_owner(Some(""), &ride("", "Airport")));
    }

    #[test]
    fn test_filter_by_search() {
        let rides = vec![ride("a", "Airport"), ride("b", "City Centre"), ride("c", "Beach")];

        let hits = filter_by_search(&rides, "airport");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].destination, "Airport");

        // Every term must match some field
        assert_eq!(filter_by_search(&rides, "gate city").len(), 1);
        assert!(filter_by_search(&rides, "mountains").is_empty());

        // Blank query keeps everything in order
        let all = filter_by_search(&rides, "   ");
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].destination, "Beach");
    }

    #[test]
    fn test_resource_paths() {
        assert_eq!(Ride::PATH, "/rides");
        assert_eq!(Donation::PATH, "/donations");
        assert_eq!(LostFoundItem::PATH, "/lost-found");
    }
}
