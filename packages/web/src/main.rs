use dioxus::logger::tracing::Level;
use dioxus::prelude::*;

use store::MarketConfig;
use ui::{SessionProvider, ToastProvider};
use views::{
    AuthCallback, DonationDetail, Donations, Giveaways, Login, LostFound, Marketplace, Profile,
    Rides, Shell, Trips,
};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Root {},
        #[route("/donations")]
        Donations {},
        #[route("/donations/:id")]
        DonationDetail { id: String },
        #[route("/rides")]
        Rides {},
        #[route("/lost-found")]
        LostFound {},
        #[route("/marketplace")]
        Marketplace {},
        #[route("/trips")]
        Trips {},
        #[route("/giveaways")]
        Giveaways {},
        #[route("/profile")]
        Profile {},
    #[end_layout]
    #[route("/login")]
    Login {},
    #[route("/auth/callback")]
    AuthCallback {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// Build-time client configuration.
const CONFIG_TOML: &str = include_str!("../market.toml");

fn main() {
    dioxus::logger::init(Level::INFO).expect("failed to init logger");
    dioxus::launch(App);
}

fn load_config() -> MarketConfig {
    match MarketConfig::from_toml(CONFIG_TOML) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring {}: {}", MarketConfig::filename(), e);
            MarketConfig::default()
        }
    }
}

#[component]
fn App() -> Element {
    let config = use_hook(load_config);

    rsx! {
        // Global app resources
        document::Stylesheet { href: ui::MARKET_CSS }
        document::Stylesheet { href: MAIN_CSS }

        ToastProvider {
            SessionProvider {
                config,
                Router::<Route> {}
            }
        }
    }
}

/// Redirect `/` to `/donations`
#[component]
fn Root() -> Element {
    let nav = use_navigator();
    nav.replace(Route::Donations {});
    rsx! {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let config = MarketConfig::from_toml(CONFIG_TOML).unwrap();
        assert_eq!(config.auth.callback_path, "/auth/callback");
        assert_eq!(config.cache.stale_time_secs, 300);
        assert_eq!(config.cache.gc_time_secs, 600);
    }

    #[test]
    fn test_routes() {
        assert_eq!(Route::Rides {}.to_string(), "/rides");
        assert_eq!(
            Route::DonationDetail { id: "d1".to_string() }.to_string(),
            "/donations/d1"
        );
        assert_eq!(Route::AuthCallback {}.to_string(), "/auth/callback");
    }
}
