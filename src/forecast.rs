//! Near-term ridership forecast: a straight least-squares line over a
//! synthetic hourly series. A demo of the reporting path, not a model.

use rand::Rng;
use serde::Serialize;

/// Predicted ridership for one future hour.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastPoint {
    pub hour: u32,
    pub forecast_passengers: i64,
}

/// How many hours past the end of the series to predict.
const HORIZON: usize = 6;

/// Builds a random 24-hour history (20 to 100 riders per hour) and predicts
/// the six hours after it.
pub fn forecast_next_hours() -> Vec<ForecastPoint> {
    let mut rng = rand::thread_rng();
    let history: Vec<f64> = (0..24).map(|_| rng.gen_range(20..100) as f64).collect();
    forecast_from_series(&history)
}

/// Fits y = slope * hour + intercept over `history` (hour 0 onward) and
/// extrapolates [`HORIZON`] hours. Predictions are truncated toward zero.
pub fn forecast_from_series(history: &[f64]) -> Vec<ForecastPoint> {
    if history.is_empty() {
        return Vec::new();
    }

    let xs: Vec<f64> = (0..history.len()).map(|h| h as f64).collect();
    let (slope, intercept) = fit_line(&xs, history);

    (history.len()..history.len() + HORIZON)
        .map(|hour| ForecastPoint {
            hour: hour as u32,
            forecast_passengers: (slope * hour as f64 + intercept) as i64,
        })
        .collect()
}

/// Closed-form ordinary least squares. A flat series has zero slope.
fn fit_line(xs: &[f64], ys: &[f64]) -> (f64, f64) {
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut num = 0.0;
    let mut den = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        num += (x - mean_x) * (y - mean_y);
        den += (x - mean_x).powi(2);
    }

    let slope = if den == 0.0 { 0.0 } else { num / den };
    (slope, mean_y - slope * mean_x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_covers_hours_24_to_29() {
        let points = forecast_next_hours();
        let hours: Vec<u32> = points.iter().map(|p| p.hour).collect();
        assert_eq!(hours, vec![24, 25, 26, 27, 28, 29]);
    }

    #[test]
    fn test_linear_series_extrapolates_exactly() {
        // y = 2x + 5 over 24 hours.
        let history: Vec<f64> = (0..24).map(|h| 2.0 * h as f64 + 5.0).collect();
        let points = forecast_from_series(&history);

        assert_eq!(points[0].forecast_passengers, 2 * 24 + 5);
        assert_eq!(points[5].forecast_passengers, 2 * 29 + 5);
    }

    #[test]
    fn test_constant_series_stays_flat() {
        let history = vec![42.0; 24];
        let points = forecast_from_series(&history);
        assert!(points.iter().all(|p| p.forecast_passengers == 42));
    }

    #[test]
    fn test_empty_history_yields_no_forecast() {
        assert!(forecast_from_series(&[]).is_empty());
    }
}
