//! # OpenCampus API Server
//!
//! HTTP entry point for the OpenCampus backend: authentication,
//! ownership-scoped content, role administration, usage counters, and the
//! admin analytics dashboard.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p opencampus-api
//! ```

use opencampus_api::{
    app::{build_router, AppState},
    config::Config,
};
use opencampus_shared::{access::RoleRegistry, db};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opencampus_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "OpenCampus API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = db::pool::create_pool(db::pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    db::migrations::run_migrations(&pool).await?;

    // Seed/repair the builtin role and permission tables
    RoleRegistry::sync(&pool).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
