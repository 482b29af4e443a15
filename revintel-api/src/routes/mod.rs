/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: liveness and readiness probes
/// - `auth`: registration and token issuance
/// - `revenue`: summary, forecast, and record ingestion
/// - `clients`: client accounts
/// - `insights`: insight listing and generation jobs
/// - `integrations`: connected data providers
/// - `attribution`: channel attribution
/// - `seo`: keyword rankings
/// - `predict`: churn prediction
///
/// Every handler behind the auth layer scopes its reads and writes to the
/// tenant in the caller's token.

pub mod attribution;
pub mod auth;
pub mod clients;
pub mod health;
pub mod insights;
pub mod integrations;
pub mod predict;
pub mod revenue;
pub mod seo;

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `{"data": ...}` envelope for list and aggregate responses
#[derive(Debug, Serialize, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Parses a path id, treating malformed ids as unknown resources
pub(crate) fn parse_id(raw: &str, resource: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("{} not found", resource)))
}

/// Trims an optional string, mapping blank values to `None`
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "Client").unwrap(), id);
        assert!(matches!(parse_id("nope", "Client"), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  acme ".to_string())), Some("acme".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }
}
