/// Application state and router builder
///
/// This module defines the shared application state, wires the stores to the
/// insight worker, and builds the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use revintel_api::app::{bootstrap, build_router};
/// use revintel_api::config::Config;
/// use revintel_shared::ids::RandomIdGenerator;
/// use revintel_shared::store::Stores;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let services = bootstrap(config, Stores::in_memory(), Arc::new(RandomIdGenerator));
///
/// tokio::spawn(services.worker.run(services.receiver));
/// let app = build_router(services.state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use revintel_shared::auth::context::authenticate_bearer;
use revintel_shared::ids::IdGenerator;
use revintel_shared::store::Stores;
use revintel_worker::generator::TemplateGenerator;
use revintel_worker::orchestrator::{InsightWorker, WorkerConfig};
use revintel_worker::queue::{InsightQueue, JobReceiver};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Every field is reference counted, so clones are cheap.
#[derive(Clone)]
pub struct AppState {
    /// Record stores
    pub stores: Stores,

    /// Id source for every record created by a handler
    pub ids: Arc<dyn IdGenerator>,

    /// Producer side of the insight worker
    pub insights: InsightQueue,

    /// Application configuration
    pub config: Arc<Config>,

    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Lifetime of issued tokens
    pub fn token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::hours(self.config.jwt.expiration_hours)
    }
}

/// Everything `main` needs to start serving
pub struct Services {
    pub state: AppState,

    /// Insight worker, not yet running
    pub worker: InsightWorker,

    /// Job channel the worker consumes
    pub receiver: JobReceiver,
}

/// Wires stores, id generator, insight queue, and worker together
pub fn bootstrap(config: Config, stores: Stores, ids: Arc<dyn IdGenerator>) -> Services {
    let (queue, receiver) = InsightQueue::new(stores.jobs.clone(), ids.clone());

    let worker = InsightWorker::new(
        stores.jobs.clone(),
        stores.insights.clone(),
        Arc::new(TemplateGenerator::new(ids.clone())),
        WorkerConfig {
            delay: Duration::from_millis(config.insights.delay_ms),
        },
    );

    let state = AppState {
        stores,
        ids,
        insights: queue,
        config: Arc::new(config),
        started_at: Instant::now(),
    };

    Services {
        state,
        worker,
        receiver,
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /health                              # Liveness (public)
/// ├── GET /ready                               # Readiness (public)
/// └── /api/v1/
///     ├── /auth/                               # Public
///     │   ├── POST /register
///     │   └── POST /token
///     └── (bearer token required)
///         ├── /revenue/    GET summary, GET forecast, POST records
///         ├── /clients/    GET /, POST /, GET /:clientId
///         ├── /insights/   GET latest, POST generate, GET jobs/:jobId
///         ├── /integrations/  GET /, POST connect/:provider
///         ├── POST /attribution/calculate
///         ├── GET  /seo/rankings
///         └── POST /predict/churn
/// ```
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, request tracing, then bearer
/// authentication on the protected routes.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let probe_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/ready", get(routes::health::readiness));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/token", post(routes::auth::login));

    let protected_routes = Router::new()
        .route("/revenue/summary", get(routes::revenue::summary))
        .route("/revenue/forecast", get(routes::revenue::forecast))
        .route("/revenue/records", post(routes::revenue::create_record))
        .route(
            "/clients",
            get(routes::clients::list_clients).post(routes::clients::create_client),
        )
        .route("/clients/:client_id", get(routes::clients::get_client))
        .route("/insights/latest", get(routes::insights::latest))
        .route("/insights/generate", post(routes::insights::generate))
        .route("/insights/jobs/:job_id", get(routes::insights::get_job))
        .route("/integrations", get(routes::integrations::list_integrations))
        .route(
            "/integrations/connect/:provider",
            post(routes::integrations::connect),
        )
        .route("/attribution/calculate", post(routes::attribution::calculate))
        .route("/seo/rankings", get(routes::seo::rankings))
        .route("/predict/churn", post(routes::predict::churn))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    Router::new()
        .merge(probe_routes)
        .nest("/api/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origins))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Bearer authentication middleware layer
///
/// Validates the token in the `Authorization` header and injects the
/// resulting [`AuthContext`](revintel_shared::auth::context::AuthContext)
/// into request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let auth = authenticate_bearer(authorization, state.jwt_secret()).map_err(|e| {
        tracing::debug!(error = %e, path = %req.uri().path(), "Authentication failed");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(auth);
    Ok(next.run(req).await)
}
