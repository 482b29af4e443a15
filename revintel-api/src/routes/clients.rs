/// Client endpoints
///
/// # Endpoints
///
/// - `GET /api/v1/clients` - Clients owned by the caller's tenant
/// - `GET /api/v1/clients/:clientId` - One client, `404` if absent or not owned
/// - `POST /api/v1/clients` - Create a client
///
/// Creation answers with the client, its onboarding link, and a one-time API
/// key. Only the key's hash is kept.

use crate::{
    app::AppState,
    error::{ApiError, ApiJson, ApiResult},
    routes::{non_blank, parse_id, Data},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use revintel_shared::auth::{api_key, context::AuthContext};
use revintel_shared::models::client::{Client, ClientPlan, CreateClient};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Client creation body
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[serde(default, alias = "companyName")]
    #[validate(length(max = 200, message = "Company name must be at most 200 characters"))]
    pub company_name: Option<String>,

    #[serde(default)]
    #[validate(length(max = 253, message = "Domain must be at most 253 characters"))]
    pub domain: Option<String>,

    #[serde(default)]
    pub industry: Option<String>,

    #[serde(default)]
    pub plan: Option<ClientPlan>,
}

/// Client creation response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateClientResponse {
    pub client: Client,
    pub onboarding_url: String,

    /// Shown once; only its hash is stored
    pub api_key: String,
}

pub async fn list_clients(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Data<Vec<Client>>>> {
    let clients = state.stores.clients.list(auth.tenant_id).await?;
    Ok(Json(Data::new(clients)))
}

pub async fn get_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(client_id): Path<String>,
) -> ApiResult<Json<Data<Client>>> {
    let client_id = parse_id(&client_id, "Client")?;

    let client = state
        .stores
        .clients
        .get(auth.tenant_id, client_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

    Ok(Json(Data::new(client)))
}

/// Create a client owned by the caller's tenant
///
/// # Errors
///
/// - `400 Bad Request`: `companyName` missing or blank
pub async fn create_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreateClientRequest>,
) -> ApiResult<(StatusCode, Json<CreateClientResponse>)> {
    req.validate()?;

    let company_name = non_blank(req.company_name)
        .ok_or_else(|| ApiError::BadRequest("Company name is required".to_string()))?;

    let mut client = Client::new(
        state.ids.next_id(),
        auth.tenant_id,
        CreateClient {
            company_name,
            domain: non_blank(req.domain).map(|d| d.to_lowercase()),
            industry: non_blank(req.industry),
            plan: req.plan.unwrap_or_default(),
        },
    );

    let (key, key_hash) = api_key::generate_api_key();
    client.api_key_hash = Some(key_hash);

    state.stores.clients.insert(client.clone()).await?;
    tracing::info!(client_id = %client.id, tenant_id = %auth.tenant_id, "Client created");

    let onboarding_url = format!("{}/onboarding/{}", state.config.api.public_base_url, client.id);

    Ok((
        StatusCode::CREATED,
        Json(CreateClientResponse {
            client,
            onboarding_url,
            api_key: key,
        }),
    ))
}
