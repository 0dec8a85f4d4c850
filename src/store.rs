//! SQLite-backed ticket store.
//!
//! Two tables, `ticket_sales` and `gps_logs`, both append-only with an
//! auto-incrementing primary key and no further indexes. The store path is
//! passed in by the caller; there is no module-level default.

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use rusqlite::{Connection, params};
use std::path::Path;
use tracing::debug;

use crate::record::{GpsLog, RawTicketRecord};

/// Rendering used for `timestamp` columns.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Largest plausible passenger count for a single sale. Anything above is
/// treated as a ticketing-machine entry error.
pub const MAX_PASSENGERS: u32 = 200;

pub struct TicketStore {
    conn: Connection,
}

impl TicketStore {
    /// Opens (or creates) the store at `path` and ensures the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating store directory {}", dir.display()))?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("opening ticket store at {}", path.display()))?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("opening in-memory ticket store")?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS ticket_sales (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    route TEXT,
                    timestamp DATETIME,
                    passengers INTEGER
                )",
                [],
            )
            .context("creating ticket_sales table")?;

        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS gps_logs (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    bus_id TEXT,
                    route TEXT,
                    timestamp DATETIME,
                    latitude REAL,
                    longitude REAL
                )",
                [],
            )
            .context("creating gps_logs table")?;

        Ok(())
    }

    /// Appends one fare-sale event. This is the ingestion boundary: an empty
    /// route or an out-of-range count is rejected here rather than deep in
    /// the pipeline.
    pub fn append(&self, route: &str, timestamp: NaiveDateTime, passengers: u32) -> Result<()> {
        if route.trim().is_empty() {
            bail!("ticket route must be non-empty");
        }
        if passengers > MAX_PASSENGERS {
            bail!("passenger count {passengers} exceeds the maximum of {MAX_PASSENGERS}");
        }

        self.conn
            .execute(
                "INSERT INTO ticket_sales (route, timestamp, passengers) VALUES (?1, ?2, ?3)",
                params![
                    route,
                    timestamp.format(TIMESTAMP_FORMAT).to_string(),
                    passengers
                ],
            )
            .context("appending ticket sale")?;
        Ok(())
    }

    /// All ticket rows appended so far, in rowid order. The order is stable
    /// but callers must not read it as chronological. NULL route/timestamp
    /// cells come back as empty strings so the cleaner can drop them.
    pub fn fetch_all(&self) -> Result<Vec<RawTicketRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT route, timestamp, passengers FROM ticket_sales ORDER BY id")
            .context("querying ticket_sales")?;

        let rows = stmt.query_map([], |row| {
            Ok(RawTicketRecord {
                route: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                timestamp: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                passengers: row.get(2)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.context("reading ticket_sales row")?);
        }
        debug!(rows = records.len(), "Fetched ticket sales");
        Ok(records)
    }

    pub fn count_tickets(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM ticket_sales", [], |row| row.get(0))
            .context("counting ticket sales")?;
        Ok(count)
    }

    /// Records one GPS fix for the peripheral map view.
    pub fn log_position(
        &self,
        bus_id: &str,
        route: &str,
        timestamp: NaiveDateTime,
        latitude: f64,
        longitude: f64,
    ) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO gps_logs (bus_id, route, timestamp, latitude, longitude)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    bus_id,
                    route,
                    timestamp.format(TIMESTAMP_FORMAT).to_string(),
                    latitude,
                    longitude
                ],
            )
            .context("appending gps log")?;
        Ok(())
    }

    pub fn fetch_positions(&self) -> Result<Vec<GpsLog>> {
        let mut stmt = self
            .conn
            .prepare("SELECT bus_id, route, timestamp, latitude, longitude FROM gps_logs ORDER BY id")
            .context("querying gps_logs")?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
            ))
        })?;

        let mut logs = Vec::new();
        for row in rows {
            let (bus_id, route, timestamp, latitude, longitude) =
                row.context("reading gps_logs row")?;
            let timestamp = NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT)
                .with_context(|| format!("parsing gps timestamp {timestamp:?}"))?;
            logs.push(GpsLog {
                bus_id,
                route,
                timestamp,
                latitude,
                longitude,
            });
        }
        Ok(logs)
    }
}
