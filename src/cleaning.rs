//! Batch cleaning for raw ticket-sales rows.
//!
//! The stages run in a fixed order: duplicate removal first (so the median
//! sees each observation once), then median imputation of missing counts,
//! then timestamp parsing, then the passenger-count range filter. Rows that
//! fail a stage are dropped silently; only the surviving batch is observable.

use chrono::NaiveDateTime;
use std::collections::HashSet;

use crate::record::{RawTicketRecord, TicketRecord};
use crate::store::{MAX_PASSENGERS, TIMESTAMP_FORMAT};

/// Accepted timestamp renderings. The store writes the first; the others
/// show up in hand-imported data.
const TIMESTAMP_FORMATS: &[&str] = &[
    TIMESTAMP_FORMAT,
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Normalizes a raw batch into validated records.
///
/// Rows with a blank route (NULL in the store comes back as an empty
/// string) are dropped along with the malformed-timestamp and out-of-range
/// rows. Missing counts are imputed with the batch median of the observed
/// counts.
/// When no count in the batch is observed, imputation is skipped and the
/// missing-count rows are dropped, so an all-missing batch cleans to the
/// empty batch. Pure and idempotent: cleaning a cleaned batch changes
/// nothing.
pub fn clean_batch(raw: Vec<RawTicketRecord>) -> Vec<TicketRecord> {
    let deduped = drop_duplicates(raw);

    let observed: Vec<i64> = deduped.iter().filter_map(|r| r.passengers).collect();
    let imputed = median(&observed);

    deduped
        .into_iter()
        .filter_map(|record| {
            if record.route.trim().is_empty() {
                return None;
            }
            let passengers = record.passengers.or(imputed)?;
            let timestamp = parse_timestamp(&record.timestamp)?;
            if passengers < 0 || passengers > MAX_PASSENGERS as i64 {
                return None;
            }
            Some(TicketRecord {
                route: record.route,
                timestamp,
                passengers: passengers as u32,
            })
        })
        .collect()
}

/// Removes exact duplicates (all fields equal), keeping first occurrences
/// in their original order.
fn drop_duplicates(records: Vec<RawTicketRecord>) -> Vec<RawTicketRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.clone()))
        .collect()
}

/// Median of the observed counts. Even-sized batches take the mean of the
/// two middle values, rounded to the nearest whole passenger (ties away
/// from zero). Deterministic for a given batch.
fn median(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some(((sorted[mid - 1] + sorted[mid]) as f64 / 2.0).round() as i64)
    }
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}
