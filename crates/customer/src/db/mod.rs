//! Database operations for the customer `PostgreSQL` schema.
//!
//! ## Tables (schema `storefront`)
//!
//! - `contact` - Registered shoppers (email, names, argon2 password hash)
//! - `address` - Postal addresses; rows without a `contact_address` link are
//!   free-standing guest addresses
//! - `contact_address` - Binds an address to a contact under an address type
//! - `customer_order` - Order history per contact
//!
//! # Migrations
//!
//! Migrations are stored in `crates/customer/migrations/` and run via:
//! ```bash
//! cargo run -p storefront-customer-cli -- migrate
//! ```

pub mod addresses;
pub mod contacts;
pub mod orders;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::{PgAddressRepository, PgContactAddressRepository};
pub use contacts::PgContactRepository;
pub use orders::PgOrderRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply the embedded migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails or the applied
/// history diverges from the embedded one.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Map a unique-violation into [`RepositoryError::Conflict`].
fn map_unique_violation(err: sqlx::Error, what: &str) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Conflict(format!("{what} already exists"))
        }
        _ => RepositoryError::Database(err),
    }
}
