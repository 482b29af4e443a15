/// Revenue ledger records
///
/// Records are append-only: once ingested they are never updated. Amounts are
/// taken as supplied by the caller, with no sign or currency validation.

use super::TenantScoped;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Source assigned when the caller omits one
pub const DEFAULT_SOURCE: &str = "direct";

/// Channel assigned when the caller omits one
pub const DEFAULT_CHANNEL: &str = "organic";

/// Currency assigned when the caller omits one
pub const DEFAULT_CURRENCY: &str = "USD";

/// A single revenue event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueRecord {
    pub id: Uuid,
    pub tenant_id: Uuid,

    /// Calendar date the revenue was booked on
    pub date: NaiveDate,

    /// Revenue source (e.g. "stripe", "shopify")
    pub source: String,

    /// Marketing channel credited with the revenue
    pub channel: String,

    pub amount: f64,
    pub currency: String,
    pub customer_id: Option<String>,

    /// Free-form caller metadata
    pub metadata: JsonValue,

    pub created_at: DateTime<Utc>,
}

/// Input for appending a record to the ledger
#[derive(Debug, Clone)]
pub struct CreateRevenueRecord {
    pub date: NaiveDate,
    pub amount: f64,
    pub source: Option<String>,
    pub channel: Option<String>,
    pub currency: Option<String>,
    pub customer_id: Option<String>,
    pub metadata: Option<JsonValue>,
}

impl RevenueRecord {
    /// Builds a record, filling defaults for omitted optional fields
    pub fn new(id: Uuid, tenant_id: Uuid, data: CreateRevenueRecord) -> Self {
        Self {
            id,
            tenant_id,
            date: data.date,
            source: data.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            channel: data.channel.unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
            amount: data.amount,
            currency: data.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            customer_id: data.customer_id,
            metadata: data
                .metadata
                .unwrap_or_else(|| JsonValue::Object(Default::default())),
            created_at: Utc::now(),
        }
    }
}

impl TenantScoped for RevenueRecord {
    fn id(&self) -> Uuid {
        self.id
    }

    fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }
}

/// Parses a record date
///
/// Accepts a plain calendar date (`2026-03-01`) or an RFC 3339 timestamp, in
/// which case the UTC date part is kept.
pub fn parse_record_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}
