pub mod api;
pub mod config;
pub mod delivery;
pub mod github;
pub mod notifications;
pub mod push;

use config::Config;
use delivery::Delivery;

/// Shared, read-only state of the webhook server
pub struct AppState {
    pub config: Config,
    pub delivery: Delivery,
}

impl AppState {
    pub fn new(config: Config, delivery: Delivery) -> Self {
        Self { config, delivery }
    }
}
