/// Attribution endpoint
///
/// `POST /api/v1/attribution/calculate` with an optional body
/// `{"model": "markov_chain"}`. The model name is echoed; the split is fixed.

use crate::{
    app::AppState,
    error::{ApiResult, OptionalJson},
    routes::{non_blank, Data},
};
use axum::{extract::State, Extension, Json};
use revintel_shared::analytics::attribution::{self, Attribution, DEFAULT_MODEL};
use revintel_shared::auth::context::AuthContext;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct AttributionRequest {
    #[serde(default)]
    pub model: Option<String>,
}

pub async fn calculate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: OptionalJson<AttributionRequest>,
) -> ApiResult<Json<Data<Attribution>>> {
    let req = body.unwrap_or_default();
    let model = non_blank(req.model).unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let records = state.stores.revenue.list(auth.tenant_id).await?;
    Ok(Json(Data::new(attribution::attribute(&records, &model))))
}
