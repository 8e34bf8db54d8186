//! Collaborator contracts of the customer service.
//!
//! The customer service never talks to `PostgreSQL` or the session layer
//! directly; it is handed implementations of these traits for the duration
//! of one request. The shipped adapters live in [`crate::db`],
//! [`crate::session`] and [`crate::services::auth`].

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::Value;
use thiserror::Error;

use storefront_customer_core::{AddressId, AddressType, ContactId};

use crate::db::RepositoryError;
use crate::models::{
    Address, AddressFields, Contact, ContactUpdate, NewContact, Order, OrderPage, PagedResult,
};
use crate::services::auth::AuthError;

/// Errors raised by session storage adapters.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backing session store failed.
    #[error("session store error: {0}")]
    Store(#[from] tower_sessions::session::Error),
}

/// Contact persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Create a contact. The store owns hashing of the supplied password.
    async fn create(&self, contact: &NewContact) -> Result<Contact, RepositoryError>;

    /// Find a contact by id.
    async fn find_by_id(&self, id: ContactId) -> Result<Option<Contact>, RepositoryError>;

    /// Update a contact, failing with `NotFound` if it does not exist.
    async fn update(&self, update: &ContactUpdate, id: ContactId)
    -> Result<Contact, RepositoryError>;
}

/// Password-hash lookup used by the password login.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactCredentials: Send + Sync {
    /// The contact and its stored argon2 hash.
    async fn password_hash(
        &self,
        id: ContactId,
    ) -> Result<Option<(Contact, String)>, RepositoryError>;
}

/// Addresses bound to a contact under an address type.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactAddressStore: Send + Sync {
    /// All addresses of the contact, optionally filtered by type.
    async fn list(
        &self,
        contact_id: ContactId,
        address_type: Option<AddressType>,
    ) -> Result<Vec<Address>, RepositoryError>;

    /// One address scoped by (address, contact, type).
    async fn get(
        &self,
        address_id: AddressId,
        contact_id: ContactId,
        address_type: AddressType,
    ) -> Result<Option<Address>, RepositoryError>;

    /// Create an address bound to the contact.
    async fn create(
        &self,
        fields: &AddressFields,
        contact_id: ContactId,
        address_type: AddressType,
    ) -> Result<Address, RepositoryError>;

    /// Update a bound address, failing with `NotFound` if no binding matches.
    async fn update(
        &self,
        fields: &AddressFields,
        address_id: AddressId,
        contact_id: ContactId,
        address_type: AddressType,
    ) -> Result<Address, RepositoryError>;

    /// Delete a bound address, failing with `NotFound` if no binding matches.
    async fn delete(
        &self,
        address_id: AddressId,
        contact_id: ContactId,
        address_type: AddressType,
    ) -> Result<(), RepositoryError>;
}

/// Free-standing addresses with no owner (used for guests).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// Find an address by id.
    async fn find_by_id(&self, id: AddressId) -> Result<Option<Address>, RepositoryError>;

    /// Create a free-standing address.
    async fn create(&self, fields: &AddressFields) -> Result<Address, RepositoryError>;

    /// Delete an address by id.
    async fn delete(&self, id: AddressId) -> Result<(), RepositoryError>;
}

/// Session-scoped key/value storage for one shopper.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read a value.
    async fn get(&self, key: &str) -> Result<Option<Value>, SessionError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: Value) -> Result<(), SessionError>;
}

/// Lookup of the contact logged in to the current session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserSession: Send + Sync {
    /// The logged-in contact's id, `None` for guests.
    ///
    /// Infallible: an unreadable session counts as a guest session.
    async fn current_contact_id(&self) -> Option<ContactId>;
}

/// Logs a contact in to the current session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactLogin: Send + Sync {
    /// Log in by contact id and plaintext password.
    async fn login_with_contact_id(
        &self,
        contact_id: ContactId,
        password: &SecretString,
    ) -> Result<(), AuthError>;
}

/// Order history of contacts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderHistory: Send + Sync {
    /// One page of a contact's orders, newest first.
    async fn orders_for_contact(
        &self,
        contact_id: ContactId,
        page: OrderPage,
    ) -> Result<PagedResult<Order>, RepositoryError>;

    /// The contact's most recent order.
    async fn latest_order_for_contact(
        &self,
        contact_id: ContactId,
    ) -> Result<Option<Order>, RepositoryError>;
}
