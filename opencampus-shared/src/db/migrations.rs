/// Embedded migration runner
///
/// Migrations are compiled in from this crate's `migrations/` directory and
/// applied on startup by whichever binary connects first; reapplying them is
/// a no-op.

use sqlx::postgres::PgPool;
use tracing::info;

/// Applies any migrations not yet recorded in `_sqlx_migrations`
///
/// # Errors
///
/// Returns an error if a migration statement fails or a previously applied
/// migration's checksum no longer matches its file.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database schema up to date");
    Ok(())
}
