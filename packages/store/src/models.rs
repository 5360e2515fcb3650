//! # Domain models for the campus marketplace
//!
//! Defines the records exchanged with the REST backend. Every type is
//! `Serialize + Deserialize` so it can be decoded from responses and stored in
//! the [`crate::QueryCache`] as JSON.
//!
//! ## Types
//!
//! | Struct | Represents | Owner field |
//! |--------|-----------|-------------|
//! | [`User`] | The signed-in member. `email` never changes after sign-up. | none |
//! | [`Donation`] | A fundraising campaign with a goal and an end date. | `user_id` |
//! | [`Ride`] | A carpool offer between two places. | `driver_id` |
//! | [`LostFoundItem`] | A lost or found object report. | `user_id` |
//! | [`Trip`] | An organised group trip. | `organizer_id` |
//! | [`Giveaway`] | A free item offered to the community. | `user_id` |
//! | [`Product`] | An item for sale. | `seller_id` |
//!
//! Each listing type has a matching `New*` draft used for `POST` requests. Drafts
//! carry no id, owner or timestamps: the backend fills those in.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated member as returned by `GET /users/me`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub department: String,
    pub email: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl User {
    /// Username, falling back to the email address when the username is blank.
    pub fn display_name(&self) -> &str {
        if self.username.trim().is_empty() {
            &self.email
        } else {
            &self.username
        }
    }
}

/// Body of `PUT /users/me`. Email is deliberately absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub department: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: String,
    pub title: String,
    pub description: String,
    pub goal_amount: f64,
    #[serde(default)]
    pub raised_amount: f64,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewDonation {
    pub title: String,
    pub description: String,
    pub goal_amount: f64,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ride {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub seats_available: u32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub notes: Option<String>,
    pub driver_id: String,
    #[serde(default)]
    pub driver_name: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewRide {
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub seats_available: u32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LostFoundKind {
    Lost,
    Found,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LostFoundStatus {
    #[default]
    Open,
    Claimed,
    Resolved,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LostFoundItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub kind: LostFoundKind,
    pub location: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: LostFoundStatus,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewLostFoundItem {
    pub title: String,
    pub description: String,
    pub kind: LostFoundKind,
    pub location: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub title: String,
    pub description: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub price: f64,
    pub capacity: u32,
    pub organizer_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewTrip {
    pub title: String,
    pub description: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub price: f64,
    pub capacity: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiveawayStatus {
    #[default]
    Available,
    Reserved,
    Claimed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Giveaway {
    pub id: String,
    pub title: String,
    pub description: String,
    pub condition: String,
    pub pickup_location: String,
    #[serde(default)]
    pub status: GiveawayStatus,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewGiveaway {
    pub title: String,
    pub description: String,
    pub condition: String,
    pub pickup_location: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Sold,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub condition: String,
    pub category: String,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub image_url: Option<String>,
    pub seller_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub condition: String,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl LostFoundKind {
    pub fn label(self) -> &'static str {
        match self {
            LostFoundKind::Lost => "Lost",
            LostFoundKind::Found => "Found",
        }
    }
}

impl LostFoundStatus {
    pub fn label(self) -> &'static str {
        match self {
            LostFoundStatus::Open => "Open",
            LostFoundStatus::Claimed => "Claimed",
            LostFoundStatus::Resolved => "Resolved",
        }
    }
}

impl GiveawayStatus {
    pub fn label(self) -> &'static str {
        match self {
            GiveawayStatus::Available => "Available",
            GiveawayStatus::Reserved => "Reserved",
            GiveawayStatus::Claimed => "Claimed",
        }
    }
}

impl ProductStatus {
    pub fn label(self) -> &'static str {
        match self {
            ProductStatus::Active => "Active",
            ProductStatus::Sold => "Sold",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_display_name_falls_back_to_email() {
        let mut user = User {
            id: "u1".to_string(),
            username: "ada".to_string(),
            department: "Mathematics".to_string(),
            email: "ada@uni.edu".to_string(),
            avatar_url: None,
        };
        assert_eq!(user.display_name(), "ada");

        user.username = "  ".to_string();
        assert_eq!(user.display_name(), "ada@uni.edu");
    }

    #[test]
    fn test_ride_decodes_backend_payload() {
        let json = r#"{
            "id": "r1",
            "origin": "Campus",
            "destination": "Airport",
            "departure_time": "2026-10-20T08:30:00Z",
            "seats_available": 3,
            "driver_id": "u1",
            "created_at": "2026-10-01T12:00:00Z"
        }"#;
        let ride: Ride = serde_json::from_str(json).unwrap();
        assert_eq!(ride.destination, "Airport");
        assert_eq!(ride.price, 0.0);
        assert!(ride.notes.is_none());
    }

    #[test]
    fn test_lost_found_enums_use_lowercase() {
        let json = r#"{
            "id": "l1",
            "title": "Blue umbrella",
            "description": "Left in the library",
            "kind": "found",
            "location": "Library",
            "date": "2026-10-10",
            "status": "claimed",
            "user_id": "u2",
            "created_at": "2026-10-10T09:00:00Z"
        }"#;
        let item: LostFoundItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, LostFoundKind::Found);
        assert_eq!(item.status, LostFoundStatus::Claimed);
        assert_eq!(item.status.label(), "Claimed");
    }

    #[test]
    fn test_profile_update_omits_email() {
        let update = ProfileUpdate {
            username: "ada".to_string(),
            department: "Physics".to_string(),
        };
        let value = serde_json::to_value(&update).unwrap();
        assert!(value.get("email").is_none());
        assert_eq!(value["department"], "Physics");
    }
}
