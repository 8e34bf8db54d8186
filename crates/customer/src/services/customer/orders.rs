//! Order history of the logged-in contact.

use storefront_customer_core::Identity;

use super::CustomerService;
use crate::error::{CustomerError, Result};
use crate::models::{Order, OrderPage, PagedResult};

impl CustomerService<'_> {
    /// One page of the contact's orders. Guests get an empty page.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the order history fails.
    pub async fn list_orders(&self, page: OrderPage) -> Result<PagedResult<Order>> {
        match self.identity().await {
            Identity::Authenticated(contact_id) => {
                tracing::debug!(%contact_id, page = page.page, page_size = page.page_size, "Listing orders");
                Ok(self.orders.orders_for_contact(contact_id, page).await?)
            }
            Identity::Guest => Ok(PagedResult::empty(page)),
        }
    }

    /// The first page of orders at the configured page size.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the order history fails.
    pub async fn list_orders_default(&self) -> Result<PagedResult<Order>> {
        self.list_orders(OrderPage::first(self.orders_page_size))
            .await
    }

    /// The contact's most recent order.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` for guests and for contacts without
    /// orders.
    pub async fn latest_order(&self) -> Result<Order> {
        let Identity::Authenticated(contact_id) = self.identity().await else {
            return Err(CustomerError::NotFound("order".to_string()));
        };

        self.orders
            .latest_order_for_contact(contact_id)
            .await?
            .ok_or_else(|| CustomerError::NotFound("order".to_string()))
    }
}
