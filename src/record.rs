//! Row types shared by the ticket store and the pipeline.

use chrono::NaiveDateTime;
use serde::Serialize;

/// A row as it comes out of `ticket_sales`: the timestamp is still text and
/// the passenger count may be NULL. This is the loosely-structured shape the
/// cleaner accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RawTicketRecord {
    pub route: String,
    pub timestamp: String,
    pub passengers: Option<i64>,
}

/// A validated fare-sale event. Produced by the cleaner; never mutated.
///
/// Invariant: `route` is non-empty, `passengers <= 200`, and the timestamp
/// parsed successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketRecord {
    pub route: String,
    pub timestamp: NaiveDateTime,
    pub passengers: u32,
}

/// One vehicle fix from `gps_logs`.
#[derive(Debug, Clone, Serialize)]
pub struct GpsLog {
    pub bus_id: String,
    pub route: String,
    pub timestamp: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
}
