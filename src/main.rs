//! HTTP server entry point.

use anyhow::Context;
use credential_gate::{build_router, ensure_schema, AuthConfig, AuthService, PgUserStore};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = AuthConfig::from_env()?;
    config.validate()?;

    let db = PgPool::connect(config.require_database_url()?)
        .await
        .context("Failed to connect to PostgreSQL")?;
    let store = PgUserStore::new(db);
    ensure_schema(store.db()).await?;

    let port = config.port;
    let auth = Arc::new(AuthService::new(Arc::new(store), config));
    let app = build_router(auth);

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("Server listening on http://localhost:{}", port);
    info!("POST /api/auth/register");
    info!("POST /api/auth/login");
    info!("GET  /api/profile");

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credential_gate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
