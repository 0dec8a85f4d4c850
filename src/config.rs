//! Environment-driven settings.
//!
//! Read once in `main` (after `dotenvy` has loaded any `.env` file) and
//! passed down explicitly; nothing in the crate reaches for the environment
//! at call time.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Settings {
    /// SQLite file backing the ticket store.
    pub db_path: PathBuf,
    /// Optional live position feed; when unset the simulator is used.
    pub bus_api_url: Option<String>,
    /// Map center used for seeding and simulated positions.
    pub default_lat: f64,
    pub default_lon: f64,
}

impl Settings {
    pub fn from_env() -> Self {
        let db_path = env::var("SMART_BUS_DB")
            .unwrap_or_else(|_| "data/smart_bus.db".to_string())
            .into();
        let bus_api_url = env::var("BUS_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let default_lat = env::var("DEFAULT_LAT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(12.9716);
        let default_lon = env::var("DEFAULT_LON")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(77.5946);

        Settings {
            db_path,
            bus_api_url,
            default_lat,
            default_lon,
        }
    }

    pub fn map_center(&self) -> (f64, f64) {
        (self.default_lat, self.default_lon)
    }
}
