//! Contact repository.
//!
//! Queries are built at runtime with `sqlx::query_as` so the crate compiles
//! without a live database or an offline query cache.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;

use storefront_customer_core::{ContactId, Email};

use super::{RepositoryError, map_unique_violation};
use crate::models::{Contact, ContactUpdate, NewContact};
use crate::ports::{ContactCredentials, ContactStore};
use crate::services::auth::hash_password;

const CONTACT_COLUMNS: &str = "id, email, first_name, last_name, created_at, updated_at";

/// A contact row together with its password hash.
#[derive(sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    contact: Contact,
    password_hash: String,
}

/// Repository for `storefront.contact`.
pub struct PgContactRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PgContactRepository<'a> {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a contact by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<Contact>, RepositoryError> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM storefront.contact WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(contact)
    }
}

#[async_trait]
impl ContactStore for PgContactRepository<'_> {
    async fn create(&self, contact: &NewContact) -> Result<Contact, RepositoryError> {
        let password_hash = hash_password(contact.password.expose_secret())
            .map_err(|e| RepositoryError::DataCorruption(format!("cannot hash password: {e}")))?;

        sqlx::query_as::<_, Contact>(&format!(
            r"
            INSERT INTO storefront.contact (email, first_name, last_name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {CONTACT_COLUMNS}
            "
        ))
        .bind(&contact.email)
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "contact email"))
    }

    async fn find_by_id(&self, id: ContactId) -> Result<Option<Contact>, RepositoryError> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM storefront.contact WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(contact)
    }

    async fn update(
        &self,
        update: &ContactUpdate,
        id: ContactId,
    ) -> Result<Contact, RepositoryError> {
        sqlx::query_as::<_, Contact>(&format!(
            r"
            UPDATE storefront.contact
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                updated_at = now()
            WHERE id = $1
            RETURNING {CONTACT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl ContactCredentials for PgContactRepository<'_> {
    async fn password_hash(
        &self,
        id: ContactId,
    ) -> Result<Option<(Contact, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {CONTACT_COLUMNS}, password_hash FROM storefront.contact WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (r.contact, r.password_hash)))
    }
}
