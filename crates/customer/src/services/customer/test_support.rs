//! Mock collaborators for customer service tests.

#![allow(clippy::unwrap_used)]

use chrono::Utc;

use storefront_customer_core::{AddressId, AddressType, ContactId, Email};

use super::{CustomerPorts, CustomerService};
use crate::models::{Address, AddressFields, Contact};
use crate::ports::{
    MockAddressStore, MockContactAddressStore, MockContactLogin, MockContactStore,
    MockOrderHistory, MockSessionStore, MockUserSession,
};

/// One mock per collaborator. Tests set expectations, then call [`Self::service`].
pub struct Mocks {
    pub contacts: MockContactStore,
    pub contact_addresses: MockContactAddressStore,
    pub addresses: MockAddressStore,
    pub session: MockSessionStore,
    pub user_session: MockUserSession,
    pub login: MockContactLogin,
    pub orders: MockOrderHistory,
}

impl Mocks {
    /// Mocks for a guest shopper.
    pub fn guest() -> Self {
        Self::with_contact(None)
    }

    /// Mocks for a logged-in contact.
    pub fn authenticated(contact_id: i32) -> Self {
        Self::with_contact(Some(ContactId::new(contact_id)))
    }

    fn with_contact(contact_id: Option<ContactId>) -> Self {
        let mut user_session = MockUserSession::new();
        user_session
            .expect_current_contact_id()
            .times(0..=1)
            .returning(move || contact_id);

        Self {
            contacts: MockContactStore::new(),
            contact_addresses: MockContactAddressStore::new(),
            addresses: MockAddressStore::new(),
            session: MockSessionStore::new(),
            user_session,
            login: MockContactLogin::new(),
            orders: MockOrderHistory::new(),
        }
    }

    pub fn service(&self) -> CustomerService<'_> {
        CustomerService::new(CustomerPorts {
            contacts: &self.contacts,
            contact_addresses: &self.contact_addresses,
            addresses: &self.addresses,
            session: &self.session,
            user_session: &self.user_session,
            login: &self.login,
            orders: &self.orders,
        })
    }
}

pub fn fields(city: &str) -> AddressFields {
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

pub fn address(id: i32, address_type: Option<AddressType>, city: &str) -> Address {
    Address {
        id: AddressId::new(id),
        address_type,
        fields: fields(city),
    }
}

pub fn contact(id: i32) -> Contact {
    Contact {
        id: ContactId::new(id),
        email: Email::parse("jane@example.com").unwrap(),
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
