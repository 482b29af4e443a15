/// Multi-touch attribution
///
/// Splits total revenue across four marketing channels using fixed weights.
/// The requested model name is reported back but every model produces the
/// same split.

use super::{round_to, total_revenue};
use crate::models::revenue::RevenueRecord;
use serde::{Deserialize, Serialize};

/// Model reported when the caller does not name one
pub const DEFAULT_MODEL: &str = "markov_chain";

/// Channel weights, summing to 1
pub const CHANNEL_WEIGHTS: [(&str, f64); 4] = [
    ("organic_search", 0.38),
    ("paid_search", 0.29),
    ("email", 0.18),
    ("social", 0.15),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelAttribution {
    pub channel: String,
    pub revenue: f64,

    /// Share of total revenue in percent
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    pub model: String,
    pub total_revenue: f64,
    pub channels: Vec<ChannelAttribution>,
}

/// Attributes a tenant's revenue to channels
pub fn attribute(records: &[RevenueRecord], model: &str) -> Attribution {
    let total = total_revenue(records);

    let channels = CHANNEL_WEIGHTS
        .iter()
        .map(|(channel, weight)| ChannelAttribution {
            channel: (*channel).to_string(),
            revenue: total * weight,
            percentage: round_to(weight * 100.0, 1),
        })
        .collect();

    Attribution {
        model: model.to_string(),
        total_revenue: total,
        channels,
    }
}
