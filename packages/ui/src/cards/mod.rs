mod donation_card;
pub use donation_card::DonationCard;

mod ride_card;
pub use ride_card::RideCard;

mod lost_found_card;
pub use lost_found_card::LostFoundCard;

mod listing_card;
pub use listing_card::{ListingCard, ListingSummary};
