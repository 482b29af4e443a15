/// Liveness and readiness probes
///
/// # Endpoints
///
/// ```text
/// GET /health   -> {"status": "healthy", "version": "0.1.0", "uptime_seconds": 42}
/// GET /ready    -> {"status": "ready", "stores": {"users": 1, "clients": 1, ...}}
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Seconds since the server started
    pub uptime_seconds: u64,
}

/// Record counts per store
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreCounts {
    pub users: usize,
    pub clients: usize,
    pub revenue_records: usize,
    pub insights: usize,
    pub integrations: usize,
    pub insight_jobs: usize,
}

/// Readiness response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub stores: StoreCounts,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// Readiness handler
///
/// Ready once every store answers a count query.
pub async fn readiness(State(state): State<AppState>) -> ApiResult<Json<ReadinessResponse>> {
    let stores = &state.stores;

    let counts = StoreCounts {
        users: stores.users.count().await?,
        clients: stores.clients.count().await?,
        revenue_records: stores.revenue.count().await?,
        insights: stores.insights.count().await?,
        integrations: stores.integrations.count().await?,
        insight_jobs: stores.jobs.count().await?,
    };

    Ok(Json(ReadinessResponse {
        status: "ready".to_string(),
        stores: counts,
    }))
}
