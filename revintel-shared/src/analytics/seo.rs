/// SEO keyword rankings
///
/// Returns a fixed sample of keyword positions for the requested domain.
/// Date filters are echoed back and not applied.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Domain reported when neither the caller nor the tenant names one
pub const DEFAULT_DOMAIN: &str = "example.com";

// (keyword, position, previous position, monthly searches, path)
const SAMPLE_KEYWORDS: [(&str, u32, u32, u32, &str); 5] = [
    ("revenue intelligence", 3, 5, 2400, "/"),
    ("revenue forecasting software", 7, 6, 1300, "/features/forecasting"),
    ("marketing attribution tool", 12, 18, 880, "/features/attribution"),
    ("churn prediction", 5, 5, 1900, "/features/churn"),
    ("saas analytics dashboard", 9, 14, 3600, "/product"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRanking {
    pub keyword: String,
    pub position: u32,
    pub previous_position: u32,

    /// Positive when the keyword moved up
    pub change: i32,
    pub search_volume: u32,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoRankings {
    pub domain: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub keywords: Vec<KeywordRanking>,
    pub average_position: f64,
}

/// Builds the sample ranking report for `domain`
pub fn sample_rankings(
    domain: &str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> SeoRankings {
    let keywords: Vec<KeywordRanking> = SAMPLE_KEYWORDS
        .iter()
        .map(|&(keyword, position, previous, volume, path)| KeywordRanking {
            keyword: keyword.to_string(),
            position,
            previous_position: previous,
            change: previous as i32 - position as i32,
            search_volume: volume,
            url: format!("https://{}{}", domain, path),
        })
        .collect();

    let average_position =
        keywords.iter().map(|k| f64::from(k.position)).sum::<f64>() / keywords.len().max(1) as f64;

    SeoRankings {
        domain: domain.to_string(),
        start_date,
        end_date,
        keywords,
        average_position,
    }
}
