/// Integration endpoints
///
/// # Endpoints
///
/// - `GET /api/v1/integrations` - Connected providers, oldest first
/// - `POST /api/v1/integrations/connect/:provider` - Simulate a provider connection
///
/// No provider is contacted. Connecting the same provider twice records two
/// connections.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::Data,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use revintel_shared::auth::context::AuthContext;
use revintel_shared::models::integration::Integration;

/// Longest accepted provider name
const MAX_PROVIDER_LENGTH: usize = 64;

pub async fn list_integrations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Data<Vec<Integration>>>> {
    let integrations = state.stores.integrations.list(auth.tenant_id).await?;
    Ok(Json(Data::new(integrations)))
}

pub async fn connect(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(provider): Path<String>,
) -> ApiResult<(StatusCode, Json<Integration>)> {
    let provider = provider.trim();
    if provider.is_empty() || provider.len() > MAX_PROVIDER_LENGTH {
        return Err(ApiError::BadRequest("Invalid provider name".to_string()));
    }

    let integration = Integration::connected(state.ids.next_id(), auth.tenant_id, provider);
    state.stores.integrations.insert(integration.clone()).await?;

    tracing::info!(
        integration_id = %integration.id,
        tenant_id = %auth.tenant_id,
        provider = %integration.provider,
        "Integration connected"
    );

    Ok((StatusCode::CREATED, Json(integration)))
}
