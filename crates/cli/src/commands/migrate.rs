//! Database migration command.
//!
//! Connects with `CUSTOMER_DATABASE_URL` (or `DATABASE_URL`) and applies the
//! migrations embedded from `crates/customer/migrations/`.

use storefront_customer::CustomerConfig;
use storefront_customer::db;

use crate::CliError;

/// Apply all pending customer migrations.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn run(config: &CustomerConfig) -> Result<(), CliError> {
    tracing::info!("Connecting to customer database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running customer migrations...");
    db::migrate(&pool).await?;

    tracing::info!("Customer migrations complete!");
    Ok(())
}
