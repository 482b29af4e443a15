/// SEO rankings endpoint
///
/// `GET /api/v1/seo/rankings?domain&startDate&endDate` returns a static
/// keyword sample. Without `domain` the caller's tenant domain is used.

use crate::{
    app::AppState,
    error::{ApiError, ApiQuery, ApiResult},
    routes::{non_blank, Data},
};
use axum::{extract::State, Extension, Json};
use revintel_shared::analytics::seo::{self, SeoRankings, DEFAULT_DOMAIN};
use revintel_shared::auth::context::AuthContext;
use revintel_shared::models::revenue::parse_record_date;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct RankingsParams {
    #[serde(default)]
    pub domain: Option<String>,

    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,

    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
}

pub async fn rankings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiQuery(params): ApiQuery<RankingsParams>,
) -> ApiResult<Json<Data<SeoRankings>>> {
    let start_date = non_blank(params.start_date)
        .map(|raw| parse_record_date(&raw).ok_or_else(|| ApiError::BadRequest(format!("Invalid startDate: {}", raw))))
        .transpose()?;
    let end_date = non_blank(params.end_date)
        .map(|raw| parse_record_date(&raw).ok_or_else(|| ApiError::BadRequest(format!("Invalid endDate: {}", raw))))
        .transpose()?;

    let domain = match non_blank(params.domain) {
        Some(domain) => domain.to_lowercase(),
        None => state
            .stores
            .clients
            .find_by_id(auth.tenant_id)
            .await?
            .and_then(|tenant| tenant.domain)
            .unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
    };

    Ok(Json(Data::new(seo::sample_rankings(&domain, start_date, end_date))))
}
