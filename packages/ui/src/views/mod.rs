mod modal_overlay;
pub use modal_overlay::ModalOverlay;

mod list_status;
pub use list_status::ListStatus;

mod rides;
pub use rides::RidesView;

mod donations;
pub use donations::{DonationDetailView, DonationsView};

mod lost_found;
pub use lost_found::LostFoundView;

mod catalog;
pub use catalog::{GiveawaysView, ProductsView, TripsView};

mod profile;
pub use profile::ProfileView;
