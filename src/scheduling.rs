//! Demand-driven service-frequency classification.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::demand::HourlyDemand;

/// Service interval assigned to one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FrequencyLabel {
    #[serde(rename = "every-5-min")]
    Every5Min,
    #[serde(rename = "every-10-min")]
    Every10Min,
    #[serde(rename = "every-20-min")]
    Every20Min,
}

impl FrequencyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyLabel::Every5Min => "every-5-min",
            FrequencyLabel::Every10Min => "every-10-min",
            FrequencyLabel::Every20Min => "every-20-min",
        }
    }
}

impl fmt::Display for FrequencyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Demand cutoffs for the classifier. A named table rather than inline
/// literals so boundary behavior can be exercised with small numbers.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdTable {
    /// Above this, service runs every 5 minutes.
    pub peak: i64,
    /// Above this (and at most `peak`), every 10 minutes; otherwise 20.
    pub moderate: i64,
}

impl ThresholdTable {
    pub const DEFAULT: ThresholdTable = ThresholdTable {
        peak: 150,
        moderate: 80,
    };
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Maps one hour's summed demand to a frequency label.
///
/// With the default table:
///
/// | Demand      | Label        |
/// |-------------|--------------|
/// | > 150       | every-5-min  |
/// | 81..=150    | every-10-min |
/// | <= 80       | every-20-min |
pub fn classify(demand: i64, thresholds: &ThresholdTable) -> FrequencyLabel {
    match demand {
        d if d > thresholds.peak => FrequencyLabel::Every5Min,
        d if d > thresholds.moderate => FrequencyLabel::Every10Min,
        _ => FrequencyLabel::Every20Min,
    }
}

/// Classifies every hour present in `demand`. One output entry per input
/// hour; the empty map classifies to the empty map.
pub fn classify_demand(
    demand: &HourlyDemand,
    thresholds: &ThresholdTable,
) -> BTreeMap<u32, FrequencyLabel> {
    demand
        .iter()
        .map(|(&hour, &d)| (hour, classify(d, thresholds)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        let t = ThresholdTable::DEFAULT;
        assert_eq!(classify(151, &t), FrequencyLabel::Every5Min);
        assert_eq!(classify(150, &t), FrequencyLabel::Every10Min);
        assert_eq!(classify(81, &t), FrequencyLabel::Every10Min);
        assert_eq!(classify(80, &t), FrequencyLabel::Every20Min);
        assert_eq!(classify(0, &t), FrequencyLabel::Every20Min);
        assert_eq!(classify(1000, &t), FrequencyLabel::Every5Min);
    }

    #[test]
    fn test_classify_empty_demand() {
        let demand = HourlyDemand::new();
        assert!(classify_demand(&demand, &ThresholdTable::DEFAULT).is_empty());
    }

    #[test]
    fn test_one_label_per_input_hour() {
        let mut demand = HourlyDemand::new();
        demand.insert(7, 200);
        demand.insert(8, 120);
        demand.insert(22, 15);

        let labels = classify_demand(&demand, &ThresholdTable::DEFAULT);
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[&7], FrequencyLabel::Every5Min);
        assert_eq!(labels[&8], FrequencyLabel::Every10Min);
        assert_eq!(labels[&22], FrequencyLabel::Every20Min);
    }

    #[test]
    fn test_thresholds_are_swappable() {
        let t = ThresholdTable { peak: 10, moderate: 5 };
        assert_eq!(classify(11, &t), FrequencyLabel::Every5Min);
        assert_eq!(classify(10, &t), FrequencyLabel::Every10Min);
        assert_eq!(classify(5, &t), FrequencyLabel::Every20Min);
    }

    #[test]
    fn test_label_rendering() {
        assert_eq!(FrequencyLabel::Every5Min.to_string(), "every-5-min");
        assert_eq!(
            serde_json::to_string(&FrequencyLabel::Every10Min).unwrap(),
            "\"every-10-min\""
        );
    }
}
