//! # OpenCampus Worker
//!
//! Background worker for OpenCampus. Drains the usage-recount job queue:
//! claims pending jobs with `FOR UPDATE SKIP LOCKED`, recomputes the user's
//! usage counters in full, and marks each job done or failed.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p opencampus-worker
//! ```

use opencampus_shared::db;
use opencampus_worker::runner::Runner;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opencampus_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "OpenCampus Worker v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

    let pool = db::pool::create_pool(db::pool::DatabaseConfig {
        url: database_url,
        ..Default::default()
    })
    .await?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let runner = Runner::new(pool.clone());
    let runner_handle = tokio::spawn(async move {
        runner.run(shutdown_rx).await;
    });

    tracing::info!("Worker ready, polling for recount jobs");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, draining...");

    let _ = shutdown_tx.send(true);
    runner_handle.await?;

    db::pool::close_pool(pool).await;

    Ok(())
}
