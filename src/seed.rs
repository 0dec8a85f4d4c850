//! Demo data seeding: random ticket sales and a handful of GPS fixes.

use anyhow::Result;
use chrono::{Duration, Local};
use rand::Rng;
use tracing::info;

use crate::store::TicketStore;

const ROUTES: &[&str] = &["Route 1", "Route 2", "Route 3", "Route 5"];

/// Inserts `n` random ticket sales spread over the last two days, with
/// 10 to 80 passengers each.
#[tracing::instrument(skip(store))]
pub fn seed_tickets(store: &TicketStore, n: usize) -> Result<()> {
    let mut rng = rand::thread_rng();
    let now = Local::now().naive_local();

    for _ in 0..n {
        let route = ROUTES[rng.gen_range(0..ROUTES.len())];
        let timestamp = now - Duration::hours(rng.gen_range(0..=48));
        let passengers = rng.gen_range(10..=80);
        store.append(route, timestamp, passengers)?;
    }

    info!(n, "Seeded ticket sales");
    Ok(())
}

/// Inserts a fixed trio of buses offset slightly from the map center.
pub fn seed_positions(store: &TicketStore, center: (f64, f64)) -> Result<()> {
    let fixes = [
        ("B1", "Route 1", 0.0, 0.0),
        ("B2", "Route 2", -0.0104, -0.0101),
        ("B3", "Route 3", 0.0094, 0.0094),
    ];
    let now = Local::now().naive_local();

    for (bus_id, route, dlat, dlon) in fixes {
        store.log_position(bus_id, route, now, center.0 + dlat, center.1 + dlon)?;
    }

    info!(buses = fixes.len(), "Seeded GPS logs");
    Ok(())
}
