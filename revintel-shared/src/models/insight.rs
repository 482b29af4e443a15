/// Generated insights
///
/// Insights are produced only by the insight worker, after a generation job
/// completes. They are never updated.

use super::TenantScoped;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of observation an insight makes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Opportunity,
    Risk,
    Trend,
    Anomaly,
}

impl InsightType {
    /// Converts type to its wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Opportunity => "opportunity",
            InsightType::Risk => "risk",
            InsightType::Trend => "trend",
            InsightType::Anomaly => "anomaly",
        }
    }

    /// Parses a type from its wire representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "opportunity" => Some(InsightType::Opportunity),
            "risk" => Some(InsightType::Risk),
            "trend" => Some(InsightType::Trend),
            "anomaly" => Some(InsightType::Anomaly),
            _ => None,
        }
    }
}

/// Estimated business impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightImpact {
    High,
    Medium,
    Low,
}

/// A short natural-language observation about a tenant's data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub id: Uuid,
    pub tenant_id: Uuid,

    #[serde(rename = "type")]
    pub insight_type: InsightType,

    pub title: String,
    pub description: String,

    /// Confidence percentage (0-100)
    pub confidence: u8,

    pub impact: InsightImpact,
    pub generated_at: DateTime<Utc>,
}

impl TenantScoped for Insight {
    fn id(&self) -> Uuid {
        self.id
    }

    fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_roundtrip_through_str() {
        for kind in [
            InsightType::Opportunity,
            InsightType::Risk,
            InsightType::Trend,
            InsightType::Anomaly,
        ] {
            assert_eq!(InsightType::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(InsightType::from_str("prophecy"), None);
    }

    #[test]
    fn test_type_field_is_renamed() {
        let insight = Insight {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            insight_type: InsightType::Trend,
            title: "t".to_string(),
            description: "d".to_string(),
            confidence: 80,
            impact: InsightImpact::Medium,
            generated_at: Utc::now(),
        };

        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["type"], "trend");
        assert_eq!(json["impact"], "medium");
    }
}
