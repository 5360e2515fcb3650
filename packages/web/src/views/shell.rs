use dioxus::prelude::*;
use ui::Navbar;

use crate::Route;

/// Layout for every signed-in or public page: navbar above the routed view.
#[component]
pub fn Shell() -> Element {
    let state = ui::use_session().state();

    rsx! {
        Navbar {
            Link { to: Route::Donations {}, active_class: "active", "Donations" }
            Link { to: Route::Rides {}, active_class: "active", "Rides" }
            Link { to: Route::LostFound {}, active_class: "active", "Lost & Found" }
            Link { to: Route::Marketplace {}, active_class: "active", "Marketplace" }
            Link { to: Route::Trips {}, active_class: "active", "Trips" }
            Link { to: Route::Giveaways {}, active_class: "active", "Giveaways" }
            if state.is_authenticated() {
                Link { to: Route::Profile {}, active_class: "active", "Profile" }
            } else if !state.is_loading {
                Link { to: Route::Login {}, "Sign in" }
            }
        }
        Outlet::<Route> {}
    }
}
