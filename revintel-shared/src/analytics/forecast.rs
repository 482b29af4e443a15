/// Revenue forecast
///
/// Projects the mean revenue per record forward at a fixed 15% compounding
/// rate. Point `i` (0-based) is `base * 1.15^(i + 1)` with bounds at +/-15%
/// and a confidence that decays by 0.05 per period down to 0.70.
///
/// Period labels are anchored at `2026-02-01` and advance one calendar month
/// per period regardless of the current date.

use super::{average_revenue, round_to, Granularity};
use crate::models::revenue::RevenueRecord;
use serde::{Deserialize, Serialize};

/// Growth applied per period
pub const GROWTH_RATE: f64 = 0.15;

/// Relative width of the prediction interval
pub const BOUND_RATIO: f64 = 0.15;

/// Periods forecast when the caller does not ask for a count
pub const DEFAULT_PERIODS: u32 = 6;

/// Upper limit for requested periods
pub const MAX_PERIODS: u32 = 24;

/// Model label reported with every forecast
pub const MODEL_NAME: &str = "linear_growth";

const INITIAL_CONFIDENCE: f64 = 0.95;
const CONFIDENCE_DECAY: f64 = 0.05;
const CONFIDENCE_FLOOR: f64 = 0.70;

// First label is February 2026
const ANCHOR_YEAR: u32 = 2026;
const ANCHOR_MONTH0: u32 = 1;

/// One projected period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// First day of the period, `YYYY-MM-DD`
    pub date: String,
    pub predicted_revenue: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub forecast: Vec<ForecastPoint>,
    pub model: String,
    pub growth_rate: f64,
    pub base_revenue: f64,
    pub granularity: Granularity,
}

/// Clamps a requested period count into `1..=MAX_PERIODS`
pub fn clamp_periods(periods: u32) -> u32 {
    periods.clamp(1, MAX_PERIODS)
}

/// Builds a forecast of `periods` points from a tenant's ledger
///
/// `periods` is clamped with [`clamp_periods`].
pub fn forecast(records: &[RevenueRecord], periods: u32, granularity: Granularity) -> Forecast {
    let base = average_revenue(records);

    let points = (0..clamp_periods(periods))
        .map(|i| {
            let predicted = base * (1.0 + GROWTH_RATE).powi(i as i32 + 1);
            ForecastPoint {
                date: period_label(i),
                predicted_revenue: predicted,
                lower_bound: predicted * (1.0 - BOUND_RATIO),
                upper_bound: predicted * (1.0 + BOUND_RATIO),
                confidence: confidence_at(i),
            }
        })
        .collect();

    Forecast {
        forecast: points,
        model: MODEL_NAME.to_string(),
        growth_rate: GROWTH_RATE,
        base_revenue: base,
        granularity,
    }
}

fn confidence_at(period: u32) -> f64 {
    let decayed = INITIAL_CONFIDENCE - CONFIDENCE_DECAY * f64::from(period);
    round_to(decayed.max(CONFIDENCE_FLOOR), 2)
}

fn period_label(period: u32) -> String {
    let month0 = ANCHOR_MONTH0 + period;
    format!("{:04}-{:02}-01", ANCHOR_YEAR + month0 / 12, month0 % 12 + 1)
}
