//! # RevIntel API Server
//!
//! Serves the RevIntel HTTP API and runs the insight worker in the same
//! process.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=... cargo run -p revintel-api
//! ```

use revintel_api::{
    app::{bootstrap, build_router},
    config::Config,
    seed,
};
use revintel_shared::ids::RandomIdGenerator;
use revintel_shared::store::Stores;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(config.json_logs);

    tracing::info!(
        "RevIntel API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let address = config.bind_address();
    let seed_demo = config.seed_demo_data;

    let services = bootstrap(config, Stores::in_memory(), Arc::new(RandomIdGenerator));

    if seed_demo {
        seed::seed_demo_data(&services.state).await?;
    }

    let shutdown = services.worker.shutdown_token();
    let worker = tokio::spawn(services.worker.run(services.receiver));

    let app = build_router(services.state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    if let Err(e) = worker.await {
        tracing::error!(error = %e, "Insight worker task panicked");
    }

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "revintel_api=debug,revintel_worker=debug,tower_http=debug".into()
    });

    let fmt_layer = if json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

async fn shutdown_signal(worker: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }

    tracing::info!("Shutdown signal received, stopping insight worker...");
    worker.cancel();
}
