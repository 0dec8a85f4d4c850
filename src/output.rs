//! Rendering and persistence for pipeline results.
//!
//! Supports per-hour log lines, JSON serialization, and CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::report::ScheduleComparison;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs one line per hour of the comparison.
pub fn print_pretty(comparison: &ScheduleComparison) {
    for row in &comparison.hours {
        info!(
            hour = row.hour,
            baseline = row.baseline,
            optimized = %row.optimized,
            "Schedule"
        );
    }
}

/// Logs the comparison as pretty-printed JSON.
pub fn print_json(comparison: &ScheduleComparison) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(comparison)?);
    Ok(())
}

/// Appends serializable rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_rows<S: Serialize>(path: &str, rows: &[S]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = rows.len(), "Appending CSV rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{BASELINE_FREQUENCY, HourSchedule};
    use crate::scheduling::FrequencyLabel;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_rows() -> Vec<HourSchedule> {
        vec![
            HourSchedule {
                hour: 8,
                baseline: BASELINE_FREQUENCY,
                optimized: FrequencyLabel::Every5Min,
            },
            HourSchedule {
                hour: 22,
                baseline: BASELINE_FREQUENCY,
                optimized: FrequencyLabel::Every20Min,
            },
        ]
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&ScheduleComparison {
            hours: sample_rows(),
        });
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&ScheduleComparison {
            hours: sample_rows(),
        })
        .unwrap();
    }

    #[test]
    fn test_append_rows_creates_file() {
        let path = temp_path("smart_bus_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_rows(&path, &sample_rows()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("every-5-min"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_rows_writes_header_once() {
        let path = temp_path("smart_bus_test_header.csv");
        let _ = fs::remove_file(&path);

        append_rows(&path, &sample_rows()).unwrap();
        append_rows(&path, &sample_rows()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content.lines().filter(|l| l.contains("baseline")).count();
        assert_eq!(header_count, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_rows_row_count() {
        let path = temp_path("smart_bus_test_rows.csv");
        let _ = fs::remove_file(&path);

        append_rows(&path, &sample_rows()).unwrap();
        append_rows(&path, &sample_rows()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // 1 header + 4 data rows
        assert_eq!(content.lines().count(), 5);

        fs::remove_file(&path).unwrap();
    }
}
