/// Analytics over the revenue ledger
///
/// Every function here is pure: it reads a snapshot of records (and clients
/// for churn) plus query parameters, and never touches a store. None of the
/// numbers come from a real model; they follow fixed formulas so that the
/// output is predictable for demos.
///
/// # Modules
///
/// - [`summary`]: totals, per-source breakdown, 6-month time series
/// - [`forecast`]: fixed-rate compound growth projection
/// - [`attribution`]: fixed four-channel revenue split
/// - [`churn`]: random churn probabilities
/// - [`seo`]: static keyword ranking sample

pub mod attribution;
pub mod churn;
pub mod forecast;
pub mod seo;
pub mod summary;

use crate::models::revenue::RevenueRecord;
use serde::{Deserialize, Serialize};

/// Reporting granularity requested by the caller
///
/// Echoed back in responses; it does not change any computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

/// Sum of all record amounts
pub fn total_revenue(records: &[RevenueRecord]) -> f64 {
    records.iter().map(|r| r.amount).sum()
}

/// Mean amount per record, 0 for an empty ledger
pub fn average_revenue(records: &[RevenueRecord]) -> f64 {
    total_revenue(records) / records.len().max(1) as f64
}

/// Rounds to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::revenue::{CreateRevenueRecord, RevenueRecord};
    use chrono::NaiveDate;
    use uuid::Uuid;

    pub fn record(date: NaiveDate, source: &str, amount: f64) -> RevenueRecord {
        RevenueRecord::new(
            Uuid::new_v4(),
            Uuid::nil(),
            CreateRevenueRecord {
                date,
                amount,
                source: Some(source.to_string()),
                channel: None,
                currency: None,
                customer_id: None,
                metadata: None,
            },
        )
    }

    pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }
}
