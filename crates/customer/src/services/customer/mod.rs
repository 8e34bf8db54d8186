//! Customer service.
//!
//! One [`CustomerService`] is built per request. Every operation first
//! resolves who the shopper is (once, then cached) and then dispatches:
//!
//! - **Authenticated** contacts read and write contact-bound addresses,
//!   their contact record and their order history.
//! - **Guests** have no account. Their billing and delivery addresses are
//!   free-standing records, and the session remembers which ones are
//!   current (`billingAddressId` / `deliveryAddressId`).
//!
//! The operations are split by concern:
//!
//! - `addresses` - list/get/create/update/delete by [`AddressType`]
//! - `contacts` - contact record access and the customer overview
//! - `registration` - contact creation, login and initial addresses
//! - `orders` - order history of the logged-in contact
//!
//! [`AddressType`]: storefront_customer_core::AddressType

mod addresses;
mod contacts;
mod identity;
mod orders;
mod registration;

#[cfg(test)]
mod test_support;

pub use identity::IdentityResolver;

use storefront_customer_core::Identity;

use crate::models::order::DEFAULT_PAGE_SIZE;
use crate::ports::{
    AddressStore, ContactAddressStore, ContactLogin, ContactStore, OrderHistory, SessionStore,
    UserSession,
};

/// The collaborators a [`CustomerService`] works with for one request.
#[derive(Clone, Copy)]
pub struct CustomerPorts<'a> {
    pub contacts: &'a dyn ContactStore,
    pub contact_addresses: &'a dyn ContactAddressStore,
    pub addresses: &'a dyn AddressStore,
    pub session: &'a dyn SessionStore,
    pub user_session: &'a dyn UserSession,
    pub login: &'a dyn ContactLogin,
    pub orders: &'a dyn OrderHistory,
}

/// Request-scoped customer service.
pub struct CustomerService<'a> {
    contacts: &'a dyn ContactStore,
    contact_addresses: &'a dyn ContactAddressStore,
    addresses: &'a dyn AddressStore,
    session: &'a dyn SessionStore,
    login: &'a dyn ContactLogin,
    orders: &'a dyn OrderHistory,
    identity: IdentityResolver<'a>,
    orders_page_size: u32,
}

impl<'a> CustomerService<'a> {
    /// Create a service for one request.
    #[must_use]
    pub fn new(ports: CustomerPorts<'a>) -> Self {
        Self {
            contacts: ports.contacts,
            contact_addresses: ports.contact_addresses,
            addresses: ports.addresses,
            session: ports.session,
            login: ports.login,
            orders: ports.orders,
            identity: IdentityResolver::new(ports.user_session),
            orders_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Use a different default page size for [`Self::list_orders_default`].
    #[must_use]
    pub fn with_orders_page_size(mut self, page_size: u32) -> Self {
        self.orders_page_size = page_size;
        self
    }

    /// The shopper's identity, resolved on first call.
    pub async fn identity(&self) -> Identity {
        self.identity.identity().await
    }

    /// The current contact id, `0` for guests.
    pub async fn contact_id(&self) -> i32 {
        self.identity.contact_id().await
    }
}
