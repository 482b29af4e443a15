/// Insight endpoints
///
/// # Endpoints
///
/// - `GET /api/v1/insights/latest?type&min_confidence&limit` - Newest insights first
/// - `POST /api/v1/insights/generate` - Queue a generation job, `202`
/// - `GET /api/v1/insights/jobs/:jobId` - Poll a generation job
///
/// A completed job carries the `insight_id` of the insight it produced.

use crate::{
    app::AppState,
    error::{ApiError, ApiJson, ApiQuery, ApiResult},
    routes::{non_blank, parse_id, Data},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use revintel_shared::auth::context::AuthContext;
use revintel_shared::models::insight::{Insight, InsightType};
use revintel_shared::models::job::{InsightJob, InsightRequest, JobStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default page size for `latest`
pub const DEFAULT_LIMIT: usize = 10;

/// Largest accepted page size
pub const MAX_LIMIT: usize = 100;

/// Insight listing filters
#[derive(Debug, Default, Deserialize)]
pub struct LatestParams {
    #[serde(default, rename = "type")]
    pub insight_type: Option<String>,

    #[serde(default, alias = "minConfidence")]
    pub min_confidence: Option<u8>,

    #[serde(default)]
    pub limit: Option<usize>,
}

/// Generation request body
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub scope: Option<String>,

    #[serde(default, alias = "focusAreas")]
    pub focus_areas: Vec<String>,

    #[serde(default, alias = "timeWindow")]
    pub time_window: Option<String>,
}

/// Accepted generation response
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub estimated_completion_seconds: u64,
}

pub async fn latest(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiQuery(params): ApiQuery<LatestParams>,
) -> ApiResult<Json<Data<Vec<Insight>>>> {
    let insight_type = match non_blank(params.insight_type) {
        Some(raw) => Some(
            InsightType::from_str(&raw.to_lowercase())
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown insight type: {}", raw)))?,
        ),
        None => None,
    };
    let min_confidence = params.min_confidence.unwrap_or(0);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let mut insights: Vec<Insight> = state
        .stores
        .insights
        .list(auth.tenant_id)
        .await?
        .into_iter()
        .filter(|i| insight_type.map_or(true, |t| i.insight_type == t))
        .filter(|i| i.confidence >= min_confidence)
        .collect();

    // Store order is oldest first; stable sort keeps it for equal timestamps
    insights.reverse();
    insights.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
    insights.truncate(limit);

    Ok(Json(Data::new(insights)))
}

/// Queue insight generation
///
/// Answers immediately; the worker materializes the insight after its delay.
pub async fn generate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> ApiResult<(StatusCode, Json<GenerateResponse>)> {
    let request = InsightRequest {
        scope: non_blank(req.scope),
        focus_areas: req
            .focus_areas
            .into_iter()
            .filter_map(|area| non_blank(Some(area)))
            .collect(),
        time_window: non_blank(req.time_window),
    };

    let job = state.insights.enqueue(auth.tenant_id, request).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(GenerateResponse {
            job_id: job.id,
            status: job.status,
            estimated_completion_seconds: state.config.insights.eta_seconds,
        }),
    ))
}

pub async fn get_job(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<Data<InsightJob>>> {
    let job_id = parse_id(&job_id, "Job")?;

    let job = state
        .insights
        .get(auth.tenant_id, job_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    Ok(Json(Data::new(job)))
}
