/// Churn prediction endpoint
///
/// `POST /api/v1/predict/churn` with an optional body
/// `{"clientIds": ["uuid", ...], "threshold": 0.5}`. Scores are random and
/// differ between calls.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, OptionalJson},
    routes::Data,
};
use axum::{extract::State, Extension, Json};
use revintel_shared::analytics::churn::{self, ChurnPrediction, DEFAULT_THRESHOLD};
use revintel_shared::auth::context::AuthContext;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct ChurnRequest {
    #[serde(default, alias = "clientIds")]
    pub client_ids: Option<Vec<String>>,

    #[serde(default)]
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChurnReport {
    pub threshold: f64,
    pub at_risk_count: usize,
    pub predictions: Vec<ChurnPrediction>,
}

pub async fn churn(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: OptionalJson<ChurnRequest>,
) -> ApiResult<Json<Data<ChurnReport>>> {
    let req = body.unwrap_or_default();

    let threshold = req.threshold.unwrap_or(DEFAULT_THRESHOLD);
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ApiError::BadRequest("threshold must be between 0 and 1".to_string()));
    }

    let client_ids = req
        .client_ids
        .map(|ids| {
            ids.iter()
                .map(|raw| {
                    Uuid::parse_str(raw.trim())
                        .map_err(|_| ApiError::BadRequest(format!("Invalid client id: {}", raw)))
                })
                .collect::<ApiResult<Vec<Uuid>>>()
        })
        .transpose()?;

    let clients = state.stores.clients.list(auth.tenant_id).await?;

    let predictions = churn::predict_churn(
        &clients,
        client_ids.as_deref(),
        threshold,
        &mut rand::thread_rng(),
    );

    Ok(Json(Data::new(ChurnReport {
        threshold,
        at_risk_count: predictions.iter().filter(|p| p.at_risk).count(),
        predictions,
    })))
}
