pub mod cache;
pub mod config;
pub mod listing;
pub mod models;
pub mod token;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local::LocalStorageTokenStore;

pub use cache::{
    CacheEvent, CachePolicy, Clock, ManualClock, QueryCache, QueryKey, Subscription, SystemClock,
};
pub use config::{ApiConfig, AuthConfig, CacheConfig, ConfigError, MarketConfig};
pub use listing::{days_left, filter_by_search, is_owner, progress_percent, Deadline, Listing, Resource};
pub use models::{
    Donation, Giveaway, GiveawayStatus, LostFoundItem, LostFoundKind, LostFoundStatus, NewDonation,
    NewGiveaway, NewLostFoundItem, NewProduct, NewRide, NewTrip, Product, ProductStatus,
    ProfileUpdate, Ride, Trip, User,
};
pub use token::{MemoryTokenStore, TokenStore, DEFAULT_TOKEN_KEY};
