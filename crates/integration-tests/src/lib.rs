//! Integration tests for the storefront customer service.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory flows (no external services)
//! cargo test -p storefront-customer-integration-tests
//!
//! # PostgreSQL adapters (needs a disposable database)
//! CUSTOMER_TEST_DATABASE_URL=postgres://localhost/customer_test \
//!     cargo test -p storefront-customer-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `customer_flows` - Service + tower-sessions adapter over an in-memory backend
//! - `postgres_repositories` - `PostgreSQL` repositories against a real database

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tower_sessions::{MemoryStore, Session};

use storefront_customer::db::{self, RepositoryError};
use storefront_customer::models::{
    Address, AddressFields, Contact, ContactUpdate, NewContact, Order, OrderPage, PagedResult,
};
use storefront_customer::ports::{
    AddressStore, ContactAddressStore, ContactCredentials, ContactStore, OrderHistory,
};
use storefront_customer::services::auth::hash_password;
use storefront_customer_core::{
    AddressId, AddressType, ContactId, Email, OrderId, OrderStatus, Price,
};

/// A fresh in-memory tower session.
#[must_use]
pub fn memory_session() -> Session {
    Session::new(None, Arc::new(MemoryStore::default()), None)
}

/// An email address no other test uses.
///
/// # Panics
///
/// Never in practice; the generated address is always valid.
#[must_use]
pub fn unique_email() -> Email {
    let local = uuid::Uuid::new_v4().simple().to_string();
    Email::parse(&format!("{local}@example.com")).unwrap_or_else(|e| panic!("{e}"))
}

/// Address fields with the given city.
#[must_use]
pub fn address_fields(city: &str) -> AddressFields {
    AddressFields {
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
        address1: Some("Main Street 1".to_string()),
        city: Some(city.to_string()),
        zip: Some("10115".to_string()),
        country_code: Some("DE".to_string()),
        ..AddressFields::default()
    }
}

/// Connect to `CUSTOMER_TEST_DATABASE_URL` and apply migrations.
///
/// # Panics
///
/// Panics if the variable is unset or the database is unreachable.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("CUSTOMER_TEST_DATABASE_URL")
        .unwrap_or_else(|_| panic!("CUSTOMER_TEST_DATABASE_URL must be set"));
    let pool = db::create_pool(&SecretString::from(url))
        .await
        .unwrap_or_else(|e| panic!("cannot connect to test database: {e}"));
    db::migrate(&pool)
        .await
        .unwrap_or_else(|e| panic!("cannot migrate test database: {e}"));
    pool
}

#[derive(Default)]
struct State {
    next_id: i32,
    contacts: Vec<(Contact, String)>,
    addresses: Vec<Address>,
    links: Vec<(ContactId, AddressId, AddressType)>,
    orders: Vec<Order>,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn is_linked(&self, address_id: AddressId) -> bool {
        self.links.iter().any(|(_, id, _)| *id == address_id)
    }

    fn bound(&self, address_id: AddressId, address_type: AddressType) -> Option<Address> {
        self.addresses
            .iter()
            .find(|a| a.id == address_id)
            .map(|a| Address {
                address_type: Some(address_type),
                ..a.clone()
            })
    }
}

/// In-memory implementation of every persistence port.
#[derive(Default, Clone)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
}

impl MemoryBackend {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record an order for a contact.
    pub fn add_order(&self, contact_id: ContactId, total: Price) -> Order {
        let mut state = self.state();
        let id = state.next_id();
        let order = Order {
            id: OrderId::new(id),
            contact_id,
            order_number: format!("SO-{id:05}"),
            status: OrderStatus::Paid,
            total,
            created_at: Utc::now(),
        };
        state.orders.push(order.clone());
        order
    }

    /// Number of address rows, linked or not.
    #[must_use]
    pub fn address_count(&self) -> usize {
        self.state().addresses.len()
    }
}

#[async_trait]
impl ContactStore for MemoryBackend {
    async fn create(&self, contact: &NewContact) -> Result<Contact, RepositoryError> {
        let password_hash = hash_password(contact.password.expose_secret())
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        let mut state = self.state();
        if state.contacts.iter().any(|(c, _)| c.email == contact.email) {
            return Err(RepositoryError::Conflict("contact email already exists".to_string()));
        }

        let now = Utc::now();
        let created = Contact {
            id: ContactId::new(state.next_id()),
            email: contact.email.clone(),
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            created_at: now,
            updated_at: now,
        };
        state.contacts.push((created.clone(), password_hash));
        Ok(created)
    }

    async fn find_by_id(&self, id: ContactId) -> Result<Option<Contact>, RepositoryError> {
        Ok(self
            .state()
            .contacts
            .iter()
            .find(|(c, _)| c.id == id)
            .map(|(c, _)| c.clone()))
    }

    async fn update(
        &self,
        update: &ContactUpdate,
        id: ContactId,
    ) -> Result<Contact, RepositoryError> {
        let mut state = self.state();
        let (contact, _) = state
            .contacts
            .iter_mut()
            .find(|(c, _)| c.id == id)
            .ok_or(RepositoryError::NotFound)?;

        if let Some(first_name) = &update.first_name {
            contact.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &update.last_name {
            contact.last_name = Some(last_name.clone());
        }
        contact.updated_at = Utc::now();
        Ok(contact.clone())
    }
}

#[async_trait]
impl ContactCredentials for MemoryBackend {
    async fn password_hash(
        &self,
        id: ContactId,
    ) -> Result<Option<(Contact, String)>, RepositoryError> {
        Ok(self
            .state()
            .contacts
            .iter()
            .find(|(c, _)| c.id == id)
            .cloned())
    }
}

#[async_trait]
impl ContactAddressStore for MemoryBackend {
    async fn list(
        &self,
        contact_id: ContactId,
        address_type: Option<AddressType>,
    ) -> Result<Vec<Address>, RepositoryError> {
        let state = self.state();
        Ok(state
            .links
            .iter()
            .filter(|(c, _, t)| *c == contact_id && address_type.is_none_or(|wanted| wanted == *t))
            .filter_map(|(_, id, t)| state.bound(*id, *t))
            .collect())
    }

    async fn get(
        &self,
        address_id: AddressId,
        contact_id: ContactId,
        address_type: AddressType,
    ) -> Result<Option<Address>, RepositoryError> {
        let state = self.state();
        let linked = state
            .links
            .contains(&(contact_id, address_id, address_type));
        Ok(linked
            .then(|| state.bound(address_id, address_type))
            .flatten())
    }

    async fn create(
        &self,
        fields: &AddressFields,
        contact_id: ContactId,
        address_type: AddressType,
    ) -> Result<Address, RepositoryError> {
        let mut state = self.state();
        let address = Address {
            id: AddressId::new(state.next_id()),
            address_type: Some(address_type),
            fields: fields.clone(),
        };
        state.addresses.push(Address {
            address_type: None,
            ..address.clone()
        });
        state.links.push((contact_id, address.id, address_type));
        Ok(address)
    }

    async fn update(
        &self,
        fields: &AddressFields,
        address_id: AddressId,
        contact_id: ContactId,
        address_type: AddressType,
    ) -> Result<Address, RepositoryError> {
        let mut state = self.state();
        if !state.links.contains(&(contact_id, address_id, address_type)) {
            return Err(RepositoryError::NotFound);
        }
        let stored = state
            .addresses
            .iter_mut()
            .find(|a| a.id == address_id)
            .ok_or(RepositoryError::NotFound)?;
        stored.fields = fields.clone();

        Ok(Address {
            address_type: Some(address_type),
            ..stored.clone()
        })
    }

    async fn delete(
        &self,
        address_id: AddressId,
        contact_id: ContactId,
        address_type: AddressType,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state();
        let before = state.links.len();
        state
            .links
            .retain(|link| *link != (contact_id, address_id, address_type));
        if state.links.len() == before {
            return Err(RepositoryError::NotFound);
        }
        if !state.is_linked(address_id) {
            state.addresses.retain(|a| a.id != address_id);
        }
        Ok(())
    }
}

#[async_trait]
impl AddressStore for MemoryBackend {
    async fn find_by_id(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        let state = self.state();
        if state.is_linked(id) {
            return Ok(None);
        }
        Ok(state.addresses.iter().find(|a| a.id == id).cloned())
    }

    async fn create(&self, fields: &AddressFields) -> Result<Address, RepositoryError> {
        let mut state = self.state();
        let address = Address {
            id: AddressId::new(state.next_id()),
            address_type: None,
            fields: fields.clone(),
        };
        state.addresses.push(address.clone());
        Ok(address)
    }

    async fn delete(&self, id: AddressId) -> Result<(), RepositoryError> {
        let mut state = self.state();
        if state.is_linked(id) {
            return Err(RepositoryError::NotFound);
        }
        let before = state.addresses.len();
        state.addresses.retain(|a| a.id != id);
        if state.addresses.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl OrderHistory for MemoryBackend {
    async fn orders_for_contact(
        &self,
        contact_id: ContactId,
        page: OrderPage,
    ) -> Result<PagedResult<Order>, RepositoryError> {
        let state = self.state();
        let mut orders: Vec<Order> = state
            .orders
            .iter()
            .filter(|o| o.contact_id == contact_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.id.as_i32().cmp(&a.id.as_i32()))
        });

        let total_count = u64::try_from(orders.len()).unwrap_or(u64::MAX);
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.page_size).unwrap_or(usize::MAX);

        Ok(PagedResult {
            entries: orders.into_iter().skip(skip).take(take).collect(),
            page: page.page,
            page_size: page.page_size,
            total_count,
        })
    }

    async fn latest_order_for_contact(
        &self,
        contact_id: ContactId,
    ) -> Result<Option<Order>, RepositoryError> {
        let page = self
            .orders_for_contact(contact_id, OrderPage::first(1))
            .await?;
        Ok(page.entries.into_iter().next())
    }
}
