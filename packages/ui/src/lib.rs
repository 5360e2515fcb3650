//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

pub mod components;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub mod platform;
pub use platform::{make_session, MarketSession, PlatformTokens};

pub mod format;
pub mod views;

pub const MARKET_CSS: Asset = asset!("/assets/market.css");

mod navbar;
pub use navbar::Navbar;

mod session;
pub use session::{use_current_user, use_session, LoginButton, LogoutButton, SessionHandle, SessionProvider};

pub mod toast;
pub use toast::{push_toast, use_toasts, ToastLevel, ToastProvider, Toasts};

mod listings;
pub use listings::{create_listing, delete_listing, use_listings, Listings};

mod confirm_dialog;
pub use confirm_dialog::{ConfirmDialog, OwnerActions};

mod search_bar;
pub use search_bar::SearchBar;

pub mod cards;
pub use cards::{DonationCard, ListingCard, ListingSummary, LostFoundCard, RideCard};

mod edit_profile_dialog;
pub use edit_profile_dialog::EditProfileDialog;

mod new_ride_dialog;
pub use new_ride_dialog::{NewRideDialog, RideForm};
