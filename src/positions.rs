//! Live bus positions: external JSON feed with a simulated fallback.
//!
//! The feed is an HTTP GET returning a JSON array of vehicle objects. It is
//! tolerated to be absent, unreachable, or sloppy about field names; the map
//! then runs on a local random walk instead.

use anyhow::Result;
use chrono::Local;
use rand::Rng;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::fetch::{BasicClient, fetch_bytes};
use crate::store::TIMESTAMP_FORMAT;

const SIM_ROUTES: &[&str] = &["5A", "12B", "Express1", "C1"];

/// One vehicle as shown on the map.
#[derive(Debug, Clone, Serialize)]
pub struct BusPosition {
    pub id: String,
    pub route: String,
    pub latitude: f64,
    pub longitude: f64,
    pub occupancy: Option<u32>,
    pub timestamp: String,
}

/// Fetches positions from `api_url`, falling back to `fleet_size` simulated
/// buses around `center` when no URL is configured or the feed is unusable.
pub async fn live_positions(
    api_url: Option<&str>,
    center: (f64, f64),
    fleet_size: usize,
) -> Vec<BusPosition> {
    if let Some(url) = api_url {
        let client = BasicClient::new();
        let fetched = match fetch_bytes(&client, url).await {
            Ok(bytes) => parse_positions(&bytes),
            Err(e) => Err(e),
        };
        match fetched {
            Ok(vehicles) if !vehicles.is_empty() => return vehicles,
            Ok(_) => warn!(url, "Position feed returned no vehicles, simulating"),
            Err(e) => warn!(url, error = %e, "Position feed unusable, simulating"),
        }
    }
    simulate_fleet(center, fleet_size)
}

/// Extracts vehicles from a feed payload.
///
/// Accepts a bare array, or an object wrapping one under `vehicles`, `data`,
/// or `results`. Field aliases: `id`/`vehicle_id`/`vid`, `lat`/`latitude`,
/// `lon`/`lng`/`longitude`, `route`/`route_id`/`line`. Entries without a
/// usable coordinate pair are skipped, never an error.
pub fn parse_positions(payload: &[u8]) -> Result<Vec<BusPosition>> {
    let value: Value = serde_json::from_slice(payload)?;

    let single;
    let items: &[Value] = match &value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => {
            if let Some(list) = ["vehicles", "data", "results"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array))
            {
                list.as_slice()
            } else {
                // A lone object is treated as a one-vehicle feed.
                single = [value.clone()];
                &single
            }
        }
        _ => &[],
    };

    let mut vehicles = Vec::new();
    for item in items {
        let Some(latitude) = number_field(item, &["lat", "latitude", "y"]) else {
            continue;
        };
        let Some(longitude) = number_field(item, &["lon", "lng", "longitude", "x"]) else {
            continue;
        };

        vehicles.push(BusPosition {
            id: string_field(item, &["id", "vehicle_id", "vid"])
                .unwrap_or_else(|| "unknown".to_string()),
            route: string_field(item, &["route", "route_id", "line"])
                .unwrap_or_else(|| "-".to_string()),
            latitude,
            longitude,
            occupancy: item
                .get("occupancy")
                .and_then(Value::as_u64)
                .map(|v| v as u32),
            timestamp: string_field(item, &["timestamp", "time", "last_update"])
                .unwrap_or_default(),
        });
    }

    debug!(vehicles = vehicles.len(), "Parsed position feed");
    Ok(vehicles)
}

fn number_field(item: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| item.get(*key))
        .find_map(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        })
}

fn string_field(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| item.get(*key))
        .find_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// Scatters `n` simulated buses around the map center.
pub fn simulate_fleet(center: (f64, f64), n: usize) -> Vec<BusPosition> {
    let mut rng = rand::thread_rng();
    let now = Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string();

    (0..n)
        .map(|i| BusPosition {
            id: format!("BUS_{}", 100 + i),
            route: SIM_ROUTES[rng.gen_range(0..SIM_ROUTES.len())].to_string(),
            latitude: center.0 + rng.gen_range(-0.02..0.02),
            longitude: center.1 + rng.gen_range(-0.02..0.02),
            occupancy: Some(rng.gen_range(10..=80)),
            timestamp: now.clone(),
        })
        .collect()
}

/// Walks one bus along a random path from the center, emitting a fix every
/// 500 ms to mimic a real-time feed.
pub async fn simulate_route(
    bus_id: &str,
    route: &str,
    steps: usize,
    center: (f64, f64),
) -> Vec<BusPosition> {
    let (mut lat, mut lon) = center;
    let mut fixes = Vec::with_capacity(steps);

    for _ in 0..steps {
        {
            let mut rng = rand::thread_rng();
            lat += rng.gen_range(-0.001..0.001);
            lon += rng.gen_range(-0.001..0.001);
            fixes.push(BusPosition {
                id: bus_id.to_string(),
                route: route.to_string(),
                latitude: lat,
                longitude: lon,
                occupancy: Some(rng.gen_range(10..=80)),
                timestamp: Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string(),
            });
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    fixes
}
