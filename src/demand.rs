//! Hour-of-day demand aggregation over a cleaned batch.

use chrono::Timelike;
use std::collections::BTreeMap;

use crate::record::TicketRecord;

/// Total passengers per hour of day (0-23). Hours with no sales are absent
/// from the map, not zero. BTreeMap keeps display iteration ascending.
pub type HourlyDemand = BTreeMap<u32, i64>;

/// Sums passenger counts per local clock hour, discarding the calendar
/// date. An empty batch yields an empty map; the grand total is preserved.
pub fn hourly_demand(batch: &[TicketRecord]) -> HourlyDemand {
    let mut demand = HourlyDemand::new();
    for record in batch {
        *demand.entry(record.timestamp.hour()).or_insert(0) += record.passengers as i64;
    }
    demand
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, hour: u32, passengers: u32) -> TicketRecord {
        TicketRecord {
            route: "R1".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2025, 9, day)
                .unwrap()
                .and_hms_opt(hour, 30, 0)
                .unwrap(),
            passengers,
        }
    }

    #[test]
    fn test_empty_batch_yields_empty_map() {
        assert!(hourly_demand(&[]).is_empty());
    }

    #[test]
    fn test_sums_within_an_hour() {
        let batch = vec![record(1, 8, 50), record(1, 8, 60), record(1, 8, 45)];
        let demand = hourly_demand(&batch);
        assert_eq!(demand.len(), 1);
        assert_eq!(demand[&8], 155);
    }

    #[test]
    fn test_calendar_date_is_discarded() {
        // Same clock hour on different days lands in one bucket.
        let batch = vec![record(1, 17, 30), record(2, 17, 25), record(3, 6, 10)];
        let demand = hourly_demand(&batch);
        assert_eq!(demand[&17], 55);
        assert_eq!(demand[&6], 10);
        assert!(!demand.contains_key(&7));
    }

    #[test]
    fn test_total_count_preserved() {
        let batch = vec![
            record(1, 0, 12),
            record(1, 5, 7),
            record(2, 5, 80),
            record(1, 23, 1),
        ];
        let demand = hourly_demand(&batch);
        let total: i64 = demand.values().sum();
        let expected: i64 = batch.iter().map(|r| r.passengers as i64).sum();
        assert_eq!(total, expected);
    }

    #[test]
    fn test_iteration_is_ascending_by_hour() {
        let batch = vec![record(1, 22, 5), record(1, 3, 5), record(1, 11, 5)];
        let hours: Vec<u32> = hourly_demand(&batch).keys().copied().collect();
        assert_eq!(hours, vec![3, 11, 22]);
    }
}
