/// Revenue endpoints
///
/// # Endpoints
///
/// - `GET /api/v1/revenue/summary?startDate&endDate&granularity`
/// - `GET /api/v1/revenue/forecast?periods&granularity`
/// - `POST /api/v1/revenue/records`
///
/// All computations run over a snapshot of the caller's ledger; see
/// [`revintel_shared::analytics`] for the formulas.

use crate::{
    app::AppState,
    error::{ApiError, ApiJson, ApiQuery, ApiResult},
    routes::{non_blank, Data},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{NaiveDate, Utc};
use revintel_shared::analytics::{
    forecast::{self, Forecast, DEFAULT_PERIODS},
    summary::{self, RevenueSummary, SummaryQuery},
    Granularity,
};
use revintel_shared::auth::context::AuthContext;
use revintel_shared::models::revenue::{parse_record_date, CreateRevenueRecord, RevenueRecord};
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Summary query parameters
#[derive(Debug, Default, Deserialize)]
pub struct SummaryParams {
    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,

    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,

    #[serde(default)]
    pub granularity: Option<Granularity>,
}

/// Forecast query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ForecastParams {
    #[serde(default)]
    pub periods: Option<u32>,

    #[serde(default)]
    pub granularity: Option<Granularity>,
}

/// Revenue record ingestion body
///
/// `amount` may be a JSON number or a numeric string.
#[derive(Debug, Default, Deserialize)]
pub struct CreateRecordRequest {
    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub amount: Option<JsonValue>,

    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub channel: Option<String>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default, alias = "customerId")]
    pub customer_id: Option<String>,

    #[serde(default)]
    pub metadata: Option<JsonValue>,
}

/// Aggregated revenue statistics
///
/// Date filters are echoed in `period` and do not narrow the figures.
pub async fn summary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiQuery(params): ApiQuery<SummaryParams>,
) -> ApiResult<Json<Data<RevenueSummary>>> {
    let query = SummaryQuery {
        start_date: parse_optional_date(params.start_date.as_deref(), "startDate")?,
        end_date: parse_optional_date(params.end_date.as_deref(), "endDate")?,
        granularity: params.granularity.unwrap_or_default(),
    };

    let records = state.stores.revenue.list(auth.tenant_id).await?;
    let today = Utc::now().date_naive();

    Ok(Json(Data::new(summary::summarize(&records, &query, today))))
}

/// Synthetic revenue forecast
pub async fn forecast(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiQuery(params): ApiQuery<ForecastParams>,
) -> ApiResult<Json<Data<Forecast>>> {
    let periods = params.periods.unwrap_or(DEFAULT_PERIODS);
    let records = state.stores.revenue.list(auth.tenant_id).await?;

    Ok(Json(Data::new(forecast::forecast(
        &records,
        periods,
        params.granularity.unwrap_or_default(),
    ))))
}

/// Ingest one revenue record
///
/// # Errors
///
/// - `400 Bad Request`: `date` or `amount` missing or unparseable
pub async fn create_record(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreateRecordRequest>,
) -> ApiResult<(StatusCode, Json<RevenueRecord>)> {
    let (Some(raw_date), Some(raw_amount)) = (req.date.as_deref(), req.amount.as_ref()) else {
        return Err(ApiError::BadRequest("Date and amount are required".to_string()));
    };

    let date = parse_record_date(raw_date).ok_or_else(|| {
        ApiError::BadRequest("date must be YYYY-MM-DD or an RFC 3339 timestamp".to_string())
    })?;
    let amount = parse_amount(raw_amount)?;

    let record = RevenueRecord::new(
        state.ids.next_id(),
        auth.tenant_id,
        CreateRevenueRecord {
            date,
            amount,
            source: non_blank(req.source),
            channel: non_blank(req.channel),
            currency: non_blank(req.currency),
            customer_id: non_blank(req.customer_id),
            metadata: req.metadata,
        },
    );

    state.stores.revenue.insert(record.clone()).await?;
    tracing::debug!(record_id = %record.id, tenant_id = %auth.tenant_id, amount, "Revenue record created");

    Ok((StatusCode::CREATED, Json(record)))
}

fn parse_optional_date(raw: Option<&str>, field: &str) -> ApiResult<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => parse_record_date(value)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid {}: {}", field, value))),
    }
}

fn parse_amount(raw: &JsonValue) -> ApiResult<f64> {
    let amount = match raw {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    amount
        .filter(|a| a.is_finite())
        .ok_or_else(|| ApiError::BadRequest("amount must be a number".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(&json!(1000)).unwrap(), 1000.0);
        assert_eq!(parse_amount(&json!(-12.5)).unwrap(), -12.5);
        assert_eq!(parse_amount(&json!(" 99.90 ")).unwrap(), 99.9);
        assert!(parse_amount(&json!("lots")).is_err());
        assert!(parse_amount(&json!("NaN")).is_err());
        assert!(parse_amount(&json!(true)).is_err());
        assert!(parse_amount(&json!(null)).is_err());
    }

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(parse_optional_date(None, "startDate").unwrap(), None);
        assert_eq!(parse_optional_date(Some(""), "startDate").unwrap(), None);
        assert_eq!(
            parse_optional_date(Some("2026-01-31"), "startDate").unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31)
        );
        assert!(parse_optional_date(Some("31/01/2026"), "startDate").is_err());
    }
}
