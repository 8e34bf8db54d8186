//! Order history models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_customer_core::{ContactId, OrderId, OrderStatus, Price};

/// Default number of orders per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A past order of a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub contact_id: ContactId,
    /// Human-facing order number.
    pub order_number: String,
    pub status: OrderStatus,
    pub total: Price,
    pub created_at: DateTime<Utc>,
}

/// Which page of the order history to fetch (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPage {
    pub page: u32,
    pub page_size: u32,
}

impl OrderPage {
    /// Create a page request.
    #[must_use]
    pub const fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// The first page with the given size.
    #[must_use]
    pub const fn first(page_size: u32) -> Self {
        Self::new(1, page_size)
    }

    /// Number of rows to skip. Page 0 is treated like page 1.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

impl Default for OrderPage {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the total row count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub entries: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
}

impl<T> PagedResult<T> {
    /// An empty page.
    #[must_use]
    pub const fn empty(page: OrderPage) -> Self {
        Self {
            entries: Vec::new(),
            page: page.page,
            page_size: page.page_size,
            total_count: 0,
        }
    }

    /// Whether no further page exists.
    #[must_use]
    pub fn is_last_page(&self) -> bool {
        u64::from(self.page.max(1)) * u64::from(self.page_size) >= self.total_count
    }
}
