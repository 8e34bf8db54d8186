//! End-to-end customer flows over the tower-sessions adapter.
//!
//! Every "request" builds a fresh `CustomerService` around the same session,
//! the way an axum handler would.

use rust_decimal::Decimal;
use secrecy::SecretString;

use storefront_customer::models::{ContactUpdate, NewContact, OrderPage};
use storefront_customer::services::auth::PasswordLogin;
use storefront_customer::session::TowerSessionStore;
use storefront_customer::{CustomerError, CustomerPorts, CustomerService};
use storefront_customer_core::{AddressType, CurrencyCode, Identity, Price};
use storefront_customer_integration_tests::{
    MemoryBackend, address_fields, memory_session, unique_email,
};

fn price(cents: i64) -> Price {
    Price::new(Decimal::new(cents, 2), CurrencyCode::EUR)
}

struct Shop {
    backend: MemoryBackend,
    session: TowerSessionStore,
}

impl Shop {
    fn new() -> Self {
        Self {
            backend: MemoryBackend::default(),
            session: TowerSessionStore::new(memory_session()),
        }
    }

    /// Run one request against the shared session.
    async fn request<T, F>(&self, handler: F) -> T
    where
        F: AsyncFnOnce(&CustomerService<'_>) -> T,
    {
        let login = PasswordLogin::new(&self.backend, self.session.session());
        let service = CustomerService::new(CustomerPorts {
            contacts: &self.backend,
            contact_addresses: &self.backend,
            addresses: &self.backend,
            session: &self.session,
            user_session: &self.session,
            login: &login,
            orders: &self.backend,
        });
        handler(&service).await
    }
}

fn new_contact(password: &str) -> NewContact {
    NewContact {
        email: unique_email(),
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
        password: SecretString::from(password.to_string()),
    }
}

#[tokio::test]
async fn test_guest_checkout_keeps_addresses_in_session() {
    let shop = Shop::new();

    let billing = shop
        .request(async |svc| {
            assert_eq!(svc.identity().await, Identity::Guest);
            svc.create_address(&address_fields("Berlin"), AddressType::Billing)
                .await
                .expect("create billing")
        })
        .await;

    // Next request: the pointer survives
    let found = shop
        .request(async |svc| {
            svc.get_address(billing.id, AddressType::Billing)
                .await
                .expect("billing from session")
        })
        .await;
    assert_eq!(found, billing);

    let delivery = shop
        .request(async |svc| svc.get_address(billing.id, AddressType::Delivery).await)
        .await;
    assert!(matches!(delivery, Err(CustomerError::NotFound(_))));
}

#[tokio::test]
async fn test_guest_replacing_billing_orphans_previous_record() {
    let shop = Shop::new();

    shop.request(async |svc| {
        svc.create_address(&address_fields("Berlin"), AddressType::Billing)
            .await
            .expect("first billing");
        svc.create_address(&address_fields("Munich"), AddressType::Billing)
            .await
            .expect("second billing");
    })
    .await;

    let listed = shop
        .request(async |svc| {
            svc.list_addresses(Some(AddressType::Billing))
                .await
                .expect("list billing")
        })
        .await;

    assert_eq!(listed.len(), 1);
    assert_eq!(
        listed.first().and_then(|a| a.fields.city.as_deref()),
        Some("Munich")
    );
    assert_eq!(shop.backend.address_count(), 2);
}

#[tokio::test]
async fn test_guest_delete_leaves_dangling_pointer() {
    let shop = Shop::new();

    let billing = shop
        .request(async |svc| {
            svc.create_address(&address_fields("Berlin"), AddressType::Billing)
                .await
                .expect("create billing")
        })
        .await;

    shop.request(async |svc| {
        svc.delete_address(billing.id, AddressType::Billing)
            .await
            .expect("delete billing");
    })
    .await;

    let result = shop
        .request(async |svc| svc.get_address(billing.id, AddressType::Billing).await)
        .await;
    assert!(matches!(result, Err(CustomerError::NotFound(_))));
}

#[tokio::test]
async fn test_registration_logs_in_and_binds_addresses() {
    let shop = Shop::new();

    let contact = shop
        .request(async |svc| {
            svc.register_customer(
                new_contact("correct horse battery staple"),
                Some(address_fields("Berlin")),
                None,
            )
            .await
            .expect("register")
        })
        .await;

    let (identity, overview) = shop
        .request(async |svc| {
            let identity = svc.identity().await;
            let overview = svc.customer_overview().await.expect("overview");
            (identity, overview)
        })
        .await;

    assert_eq!(identity, Identity::Authenticated(contact.id));
    let overview = overview.expect("contact exists");
    assert_eq!(overview.contact, contact);

    let mut types: Vec<_> = overview
        .addresses
        .iter()
        .filter_map(|a| a.address_type)
        .collect();
    types.sort_by_key(|t| t.code());
    assert_eq!(types, vec![AddressType::Billing, AddressType::Delivery]);
    assert!(
        overview
            .addresses
            .iter()
            .all(|a| a.fields.city.as_deref() == Some("Berlin"))
    );
}

#[tokio::test]
async fn test_authenticated_update_and_orders() {
    let shop = Shop::new();

    let contact = shop
        .request(async |svc| {
            svc.register_customer(new_contact("correct horse battery staple"), None, None)
                .await
                .expect("register")
        })
        .await;
    shop.backend.add_order(contact.id, price(1999));
    let latest = shop.backend.add_order(contact.id, price(4999));

    shop.request(async |svc| {
        let updated = svc
            .update_contact(&ContactUpdate {
                first_name: Some("Janet".to_string()),
                last_name: None,
            })
            .await
            .expect("update contact");
        assert_eq!(updated.full_name(), "Janet Doe");

        let page = svc
            .list_orders(OrderPage::new(1, 1))
            .await
            .expect("list orders");
        assert_eq!(page.total_count, 2);
        assert_eq!(page.entries.len(), 1);
        assert!(!page.is_last_page());

        let found = svc.latest_order().await.expect("latest order");
        assert_eq!(found.id, latest.id);
    })
    .await;
}

#[tokio::test]
async fn test_authenticated_address_lifecycle() {
    let shop = Shop::new();

    shop.request(async |svc| {
        svc.register_customer(new_contact("correct horse battery staple"), None, None)
            .await
            .expect("register");
    })
    .await;

    shop.request(async |svc| {
        let created = svc
            .create_address(&address_fields("Essen"), AddressType::Warehouse)
            .await
            .expect("create warehouse");
        let updated = svc
            .update_address(created.id, &address_fields("Bochum"), AddressType::Warehouse)
            .await
            .expect("update warehouse");
        assert_eq!(updated.fields.city.as_deref(), Some("Bochum"));

        let wrong_type = svc
            .update_address(created.id, &address_fields("Dortmund"), AddressType::Billing)
            .await;
        assert!(matches!(wrong_type, Err(CustomerError::NotFound(_))));

        svc.delete_address(created.id, AddressType::Warehouse)
            .await
            .expect("delete warehouse");
        assert!(
            svc.list_addresses(Some(AddressType::Warehouse))
                .await
                .expect("list")
                .is_empty()
        );
    })
    .await;
}

#[tokio::test]
async fn test_logout_returns_to_guest_mode() {
    let shop = Shop::new();

    shop.request(async |svc| {
        svc.register_customer(new_contact("correct horse battery staple"), None, None)
            .await
            .expect("register");
    })
    .await;

    shop.session
        .clear_current_contact()
        .await
        .expect("logout");

    let (identity, orders) = shop
        .request(async |svc| {
            (
                svc.identity().await,
                svc.list_orders_default().await.expect("guest orders"),
            )
        })
        .await;
    assert_eq!(identity, Identity::Guest);
    assert!(orders.entries.is_empty());
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict() {
    let shop = Shop::new();
    let first = new_contact("correct horse battery staple");
    let duplicate = NewContact {
        password: SecretString::from("another password".to_string()),
        ..first.clone()
    };

    shop.request(async |svc| {
        svc.register_customer(first, None, None)
            .await
            .expect("first registration");
    })
    .await;

    let second = shop
        .request(async |svc| svc.register_customer(duplicate, None, None).await)
        .await;
    assert!(matches!(second, Err(CustomerError::Repository(_))));
}
