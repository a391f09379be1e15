//! Database migration command.

use avenue_core::config::{AppConfig, CatalogBackend};
use avenue_core::error::AppError;
use avenue_database::DatabasePool;
use avenue_database::migration::run_migrations;

use crate::output;

/// Apply all pending migrations to the configured database.
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    if config.database.backend == CatalogBackend::Memory {
        output::print_warning("The in-memory catalog has no schema to migrate.");
        return Ok(());
    }

    let pool = DatabasePool::connect(&config.database).await?;
    run_migrations(pool.pool()).await?;
    pool.close().await;
    output::print_success("All migrations applied successfully.");
    Ok(())
}
