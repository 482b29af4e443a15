/// Revenue summary
///
/// # Formulas
///
/// - `mrr` = 0.85 x total revenue, `arr` = 12 x mrr
/// - `growth_rate` is a fixed placeholder
/// - per-source `percentage` is formatted to one decimal place
/// - `time_series` holds 6 monthly buckets, oldest first; each bucket covers
///   30 days from the first of its month and estimates its transaction count
///   as `round(revenue / 500)`
///
/// The `start_date`/`end_date` filters are echoed in `period` but are not
/// applied to any figure.

use super::{average_revenue, total_revenue, Granularity};
use crate::models::revenue::RevenueRecord;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Growth rate reported by every summary
pub const PLACEHOLDER_GROWTH_RATE: f64 = 12.5;

/// Share of total revenue reported as MRR
pub const MRR_RATIO: f64 = 0.85;

/// Number of monthly buckets in the time series
pub const TIME_SERIES_MONTHS: u32 = 6;

/// Days summed per time series bucket
pub const BUCKET_DAYS: u64 = 30;

/// Revenue per estimated transaction
pub const REVENUE_PER_TRANSACTION: f64 = 500.0;

/// Summary query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub granularity: Granularity,
}

/// Revenue attributed to one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceBreakdown {
    pub source: String,
    pub revenue: f64,

    /// Share of total revenue, one decimal place (e.g. `"38.2"`)
    pub percentage: String,
}

/// One month of the trailing time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    /// Month label, `YYYY-MM`
    pub period: String,
    pub period_start: NaiveDate,
    pub revenue: f64,

    /// Estimated, not counted
    pub transactions: u64,
}

/// Aggregated revenue statistics for one tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub total_revenue: f64,
    pub average_revenue: f64,
    pub record_count: usize,
    pub growth_rate: f64,
    pub mrr: f64,
    pub arr: f64,
    pub period: SummaryQuery,
    pub by_source: Vec<SourceBreakdown>,
    pub time_series: Vec<TimeBucket>,
}

/// Summarizes a tenant's ledger as of `today`
pub fn summarize(records: &[RevenueRecord], query: &SummaryQuery, today: NaiveDate) -> RevenueSummary {
    let total = total_revenue(records);
    let mrr = total * MRR_RATIO;

    RevenueSummary {
        total_revenue: total,
        average_revenue: average_revenue(records),
        record_count: records.len(),
        growth_rate: PLACEHOLDER_GROWTH_RATE,
        mrr,
        arr: mrr * 12.0,
        period: query.clone(),
        by_source: breakdown_by_source(records, total),
        time_series: monthly_time_series(records, today),
    }
}

/// Groups revenue by source, largest first
pub fn breakdown_by_source(records: &[RevenueRecord], total: f64) -> Vec<SourceBreakdown> {
    let mut by_source: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        *by_source.entry(record.source.as_str()).or_default() += record.amount;
    }

    let mut breakdown: Vec<SourceBreakdown> = by_source
        .into_iter()
        .map(|(source, revenue)| SourceBreakdown {
            source: source.to_string(),
            revenue,
            percentage: format_percentage(revenue, total),
        })
        .collect();

    // BTreeMap order is the tie-breaker
    breakdown.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    breakdown
}

fn format_percentage(part: f64, total: f64) -> String {
    if total == 0.0 {
        return "0.0".to_string();
    }
    format!("{:.1}", part / total * 100.0)
}

/// Builds the trailing monthly series ending with the month of `today`
pub fn monthly_time_series(records: &[RevenueRecord], today: NaiveDate) -> Vec<TimeBucket> {
    let current_month = today - Days::new(u64::from(today.day0()));

    (0..TIME_SERIES_MONTHS)
        .rev()
        .filter_map(|months_back| current_month.checked_sub_months(Months::new(months_back)))
        .map(|start| {
            let end = start + Days::new(BUCKET_DAYS);
            let revenue: f64 = records
                .iter()
                .filter(|r| r.date >= start && r.date < end)
                .map(|r| r.amount)
                .sum();

            TimeBucket {
                period: start.format("%Y-%m").to_string(),
                period_start: start,
                revenue,
                transactions: (revenue / REVENUE_PER_TRANSACTION).round().max(0.0) as u64,
            }
        })
        .collect()
}
