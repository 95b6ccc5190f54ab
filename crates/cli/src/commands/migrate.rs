//! Database migration command.
//!
//! Runs the migrations embedded in the storefront crate against the
//! database named by `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`).

use spindle_storefront::db::MIGRATOR;

use super::{CommandError, connect};

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running storefront migrations...");
    MIGRATOR.run(&pool).await?;
    tracing::info!("Storefront migrations complete");

    Ok(())
}
