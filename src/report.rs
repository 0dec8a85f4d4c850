//! Schedule comparison: the static baseline against demand-derived
//! frequencies, composed from the cleaning, aggregation, and classification
//! stages.

use serde::Serialize;
use tracing::debug;

use crate::cleaning::clean_batch;
use crate::demand::hourly_demand;
use crate::record::RawTicketRecord;
use crate::scheduling::{FrequencyLabel, ThresholdTable, classify_demand};

/// The static schedule runs every 15 minutes for all routes and hours.
pub const BASELINE_FREQUENCY: &str = "every-15-min";

/// One row of the comparison: the fixed baseline next to the classified
/// frequency for an hour that actually had demand.
#[derive(Debug, Clone, Serialize)]
pub struct HourSchedule {
    pub hour: u32,
    pub baseline: &'static str,
    pub optimized: FrequencyLabel,
}

/// Per-hour comparison rows, ascending by hour. Hours absent from the
/// demand mapping are absent here; nothing is defaulted.
#[derive(Debug, Serialize)]
pub struct ScheduleComparison {
    pub hours: Vec<HourSchedule>,
}

/// Outcome of one pipeline run. `NoData` is an explicit state for the
/// caller to render as a warning, not an error.
#[derive(Debug)]
pub enum ScheduleReport {
    NoData,
    Comparison(ScheduleComparison),
}

impl ScheduleReport {
    pub fn is_no_data(&self) -> bool {
        matches!(self, ScheduleReport::NoData)
    }
}

/// Runs the full pipeline over one raw batch: clean, aggregate by hour,
/// classify, and pair each hour with the baseline. A batch with zero usable
/// records after cleaning yields [`ScheduleReport::NoData`].
#[tracing::instrument(skip(raw), fields(raw_rows = raw.len()))]
pub fn compare_schedules(raw: Vec<RawTicketRecord>, thresholds: &ThresholdTable) -> ScheduleReport {
    let cleaned = clean_batch(raw);
    if cleaned.is_empty() {
        debug!("No usable records after cleaning");
        return ScheduleReport::NoData;
    }
    debug!(cleaned_rows = cleaned.len(), "Batch cleaned");

    let demand = hourly_demand(&cleaned);
    let labels = classify_demand(&demand, thresholds);

    let hours = labels
        .into_iter()
        .map(|(hour, optimized)| HourSchedule {
            hour,
            baseline: BASELINE_FREQUENCY,
            optimized,
        })
        .collect();

    ScheduleReport::Comparison(ScheduleComparison { hours })
}
