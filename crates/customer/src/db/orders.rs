//! Order history repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use storefront_customer_core::{ContactId, CurrencyCode, OrderId, OrderStatus, Price};

use super::RepositoryError;
use crate::models::{Order, OrderPage, PagedResult};
use crate::ports::OrderHistory;

const ORDER_COLUMNS: &str =
    "id, contact_id, order_number, status, total_amount, currency_code, created_at";

/// Raw `customer_order` row; status and currency are stored as text.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    contact_id: ContactId,
    order_number: String,
    status: String,
    total_amount: Decimal,
    currency_code: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", row.id))
        })?;
        let currency_code = row.currency_code.parse::<CurrencyCode>().map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            contact_id: row.contact_id,
            order_number: row.order_number,
            status,
            total: Price::new(row.total_amount, currency_code),
            created_at: row.created_at,
        })
    }
}

/// Repository for `storefront.customer_order`.
pub struct PgOrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PgOrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderHistory for PgOrderRepository<'_> {
    async fn orders_for_contact(
        &self,
        contact_id: ContactId,
        page: OrderPage,
    ) -> Result<PagedResult<Order>, RepositoryError> {
        let total_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM storefront.customer_order WHERE contact_id = $1")
                .bind(contact_id)
                .fetch_one(self.pool)
                .await?;

        let offset = i64::try_from(page.offset())
            .map_err(|_| RepositoryError::DataCorruption("page offset out of range".to_string()))?;

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM storefront.customer_order
            WHERE contact_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(contact_id)
        .bind(i64::from(page.page_size))
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PagedResult {
            entries,
            page: page.page,
            page_size: page.page_size,
            total_count: u64::try_from(total_count).unwrap_or_default(),
        })
    }

    async fn latest_order_for_contact(
        &self,
        contact_id: ContactId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM storefront.customer_order
            WHERE contact_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "
        ))
        .bind(contact_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }
}
