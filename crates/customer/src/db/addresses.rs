//! Address repositories.
//!
//! [`PgContactAddressRepository`] works on addresses linked to a contact
//! through `storefront.contact_address`. [`PgAddressRepository`] only sees
//! free-standing rows (no link at all), which is what guest shoppers own.

use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use storefront_customer_core::{AddressId, AddressType, ContactId};

use super::RepositoryError;
use crate::models::{Address, AddressFields};
use crate::ports::{AddressStore, ContactAddressStore};

const FIELD_COLUMNS: &str = "first_name, last_name, company, address1, address2, city, \
                             province_code, zip, country_code, phone";

/// Bind all address fields as `$n..$n+9` in column order.
fn bind_fields<'q>(
    query: QueryAs<'q, Postgres, Address, PgArguments>,
    fields: &'q AddressFields,
) -> QueryAs<'q, Postgres, Address, PgArguments> {
    query
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.company)
        .bind(&fields.address1)
        .bind(&fields.address2)
        .bind(&fields.city)
        .bind(&fields.province_code)
        .bind(&fields.zip)
        .bind(&fields.country_code)
        .bind(&fields.phone)
}

fn insert_address_sql() -> String {
    format!(
        r"
        INSERT INTO storefront.address ({FIELD_COLUMNS})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, NULL::integer AS address_type, {FIELD_COLUMNS}
        "
    )
}

/// Repository for contact-bound addresses.
pub struct PgContactAddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PgContactAddressRepository<'a> {
    /// Create a new contact address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactAddressStore for PgContactAddressRepository<'_> {
    async fn list(
        &self,
        contact_id: ContactId,
        address_type: Option<AddressType>,
    ) -> Result<Vec<Address>, RepositoryError> {
        let addresses = sqlx::query_as::<_, Address>(
            r"
            SELECT a.id, ca.type_id AS address_type,
                   a.first_name, a.last_name, a.company, a.address1, a.address2,
                   a.city, a.province_code, a.zip, a.country_code, a.phone
            FROM storefront.contact_address ca
            JOIN storefront.address a ON a.id = ca.address_id
            WHERE ca.contact_id = $1
              AND ($2::integer IS NULL OR ca.type_id = $2)
            ORDER BY ca.type_id, a.id
            ",
        )
        .bind(contact_id)
        .bind(address_type)
        .fetch_all(self.pool)
        .await?;

        Ok(addresses)
    }

    async fn get(
        &self,
        address_id: AddressId,
        contact_id: ContactId,
        address_type: AddressType,
    ) -> Result<Option<Address>, RepositoryError> {
        let address = sqlx::query_as::<_, Address>(
            r"
            SELECT a.id, ca.type_id AS address_type,
                   a.first_name, a.last_name, a.company, a.address1, a.address2,
                   a.city, a.province_code, a.zip, a.country_code, a.phone
            FROM storefront.contact_address ca
            JOIN storefront.address a ON a.id = ca.address_id
            WHERE ca.address_id = $1 AND ca.contact_id = $2 AND ca.type_id = $3
            ",
        )
        .bind(address_id)
        .bind(contact_id)
        .bind(address_type)
        .fetch_optional(self.pool)
        .await?;

        Ok(address)
    }

    async fn create(
        &self,
        fields: &AddressFields,
        contact_id: ContactId,
        address_type: AddressType,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = insert_address_sql();
        let mut address = bind_fields(sqlx::query_as::<_, Address>(&sql), fields)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            r"
            INSERT INTO storefront.contact_address (contact_id, address_id, type_id)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(contact_id)
        .bind(address.id)
        .bind(address_type)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        address.address_type = Some(address_type);
        Ok(address)
    }

    async fn update(
        &self,
        fields: &AddressFields,
        address_id: AddressId,
        contact_id: ContactId,
        address_type: AddressType,
    ) -> Result<Address, RepositoryError> {
        let sql = format!(
            r"
            UPDATE storefront.address a
            SET ({FIELD_COLUMNS}) = ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            FROM storefront.contact_address ca
            WHERE a.id = $11
              AND ca.address_id = a.id
              AND ca.contact_id = $12
              AND ca.type_id = $13
            RETURNING a.id, ca.type_id AS address_type,
                      a.first_name, a.last_name, a.company, a.address1, a.address2,
                      a.city, a.province_code, a.zip, a.country_code, a.phone
            "
        );

        bind_fields(sqlx::query_as::<_, Address>(&sql), fields)
            .bind(address_id)
            .bind(contact_id)
            .bind(address_type)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete(
        &self,
        address_id: AddressId,
        contact_id: ContactId,
        address_type: AddressType,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let unlinked = sqlx::query(
            r"
            DELETE FROM storefront.contact_address
            WHERE address_id = $1 AND contact_id = $2 AND type_id = $3
            ",
        )
        .bind(address_id)
        .bind(contact_id)
        .bind(address_type)
        .execute(&mut *tx)
        .await?;

        if unlinked.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        // The same address may still be linked under another type
        sqlx::query(
            r"
            DELETE FROM storefront.address
            WHERE id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM storefront.contact_address WHERE address_id = $1
              )
            ",
        )
        .bind(address_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Repository for free-standing (guest) addresses.
pub struct PgAddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PgAddressRepository<'a> {
    /// Create a new free-standing address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressStore for PgAddressRepository<'_> {
    async fn find_by_id(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        let address = sqlx::query_as::<_, Address>(&format!(
            r"
            SELECT id, NULL::integer AS address_type, {FIELD_COLUMNS}
            FROM storefront.address a
            WHERE id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM storefront.contact_address ca WHERE ca.address_id = a.id
              )
            "
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(address)
    }

    async fn create(&self, fields: &AddressFields) -> Result<Address, RepositoryError> {
        let sql = insert_address_sql();
        let address = bind_fields(sqlx::query_as::<_, Address>(&sql), fields)
            .fetch_one(self.pool)
            .await?;

        Ok(address)
    }

    async fn delete(&self, id: AddressId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM storefront.address a
            WHERE id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM storefront.contact_address ca WHERE ca.address_id = a.id
              )
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
