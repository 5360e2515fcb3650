mod login;
pub use login::Login;

mod auth_callback;
pub use auth_callback::AuthCallback;

mod shell;
pub use shell::Shell;

mod pages;
pub use pages::{DonationDetail, Donations, Giveaways, LostFound, Marketplace, Profile, Rides, Trips};
