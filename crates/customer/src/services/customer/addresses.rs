//! Dual-mode address operations.

use serde_json::Value;

use storefront_customer_core::{AddressId, AddressType, Identity};

use super::CustomerService;
use crate::error::{CustomerError, Result};
use crate::models::{Address, AddressFields, session_keys};

impl CustomerService<'_> {
    /// List the shopper's addresses, optionally of one type.
    ///
    /// Guests see at most the single billing or delivery address their
    /// session points at; any other type (or no type) yields nothing.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if a store or the session fails.
    pub async fn list_addresses(&self, address_type: Option<AddressType>) -> Result<Vec<Address>> {
        match self.identity().await {
            Identity::Authenticated(contact_id) => {
                tracing::debug!(%contact_id, ?address_type, "Listing contact addresses");
                Ok(self
                    .contact_addresses
                    .list(contact_id, address_type)
                    .await?)
            }
            Identity::Guest => {
                let Some(address_type) = address_type else {
                    return Ok(Vec::new());
                };
                Ok(self
                    .guest_address(address_type)
                    .await?
                    .into_iter()
                    .collect())
            }
        }
    }

    /// Get one address.
    ///
    /// Guests cannot prove ownership of an arbitrary id, so for them
    /// `address_id` is ignored and the session pointer of `address_type` is
    /// used instead.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if no matching address exists or the
    /// guest session has no pointer for the type.
    pub async fn get_address(
        &self,
        address_id: AddressId,
        address_type: AddressType,
    ) -> Result<Address> {
        let address = match self.identity().await {
            Identity::Authenticated(contact_id) => {
                self.contact_addresses
                    .get(address_id, contact_id, address_type)
                    .await?
            }
            Identity::Guest => self.guest_address(address_type).await?,
        };

        address.ok_or_else(|| CustomerError::NotFound(format!("{address_type} address")))
    }

    /// Create an address of the given type.
    ///
    /// A guest's new billing or delivery address replaces the previous one in
    /// the session; the old record is left in place.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if a store or the session fails.
    pub async fn create_address(
        &self,
        fields: &AddressFields,
        address_type: AddressType,
    ) -> Result<Address> {
        match self.identity().await {
            Identity::Authenticated(contact_id) => {
                let address = self
                    .contact_addresses
                    .create(fields, contact_id, address_type)
                    .await?;
                tracing::debug!(%contact_id, address_id = %address.id, %address_type, "Created contact address");
                Ok(address)
            }
            Identity::Guest => self.create_guest_address(fields, address_type).await,
        }
    }

    /// Update a contact-bound address.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::Unsupported` for guests, `CustomerError::NotFound`
    /// if the contact has no such address of that type.
    pub async fn update_address(
        &self,
        address_id: AddressId,
        fields: &AddressFields,
        address_type: AddressType,
    ) -> Result<Address> {
        let Identity::Authenticated(contact_id) = self.identity().await else {
            return Err(CustomerError::Unsupported(
                "guests cannot update addresses".to_string(),
            ));
        };

        Ok(self
            .contact_addresses
            .update(fields, address_id, contact_id, address_type)
            .await?)
    }

    /// Delete an address.
    ///
    /// Guests delete by id only; the session pointer is not cleared, so it
    /// may dangle until the next address of that type is created.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if the store has nothing to delete.
    pub async fn delete_address(&self, address_id: AddressId, address_type: AddressType) -> Result<()> {
        match self.identity().await {
            Identity::Authenticated(contact_id) => {
                self.contact_addresses
                    .delete(address_id, contact_id, address_type)
                    .await?;
            }
            Identity::Guest => {
                self.addresses.delete(address_id).await?;
            }
        }
        tracing::debug!(%address_id, %address_type, "Deleted address");
        Ok(())
    }

    async fn create_guest_address(
        &self,
        fields: &AddressFields,
        address_type: AddressType,
    ) -> Result<Address> {
        let address = self.addresses.create(fields).await?;

        if let Some(key) = session_keys::address_pointer(address_type) {
            self.session
                .set(key, Value::from(address.id.as_i32()))
                .await?;
            tracing::debug!(address_id = %address.id, %address_type, "Bound guest address to session");
        }

        Ok(address)
    }

    /// The address a guest session points at for `address_type`, if any.
    async fn guest_address(&self, address_type: AddressType) -> Result<Option<Address>> {
        let Some(address_id) = self.session_pointer(address_type).await? else {
            return Ok(None);
        };
        Ok(self.addresses.find_by_id(address_id).await?)
    }

    async fn session_pointer(&self, address_type: AddressType) -> Result<Option<AddressId>> {
        let Some(key) = session_keys::address_pointer(address_type) else {
            return Ok(None);
        };

        let Some(value) = self.session.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_value::<AddressId>(value) {
            Ok(address_id) => Ok(Some(address_id).filter(AddressId::is_assigned)),
            Err(err) => {
                tracing::warn!(key, error = %err, "Ignoring malformed address pointer in session");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::db::RepositoryError;
    use crate::services::customer::test_support::{Mocks, address, fields};

    #[tokio::test]
    async fn test_guest_without_pointer_gets_not_found() {
        let mut mocks = Mocks::guest();
        mocks.session.expect_get().returning(|_| Ok(None));
        mocks.addresses.expect_find_by_id().never();

        let service = mocks.service();
        for address_type in [AddressType::Billing, AddressType::Delivery] {
            let result = service.get_address(AddressId::new(5), address_type).await;
            assert!(matches!(result, Err(CustomerError::NotFound(_))));
        }
    }

    #[tokio::test]
    async fn test_guest_get_ignores_supplied_id() {
        let mut mocks = Mocks::guest();
        mocks
            .session
            .expect_get()
            .withf(|key| key == session_keys::DELIVERY_ADDRESS_ID)
            .returning(|_| Ok(Some(json!(8))));
        mocks
            .addresses
            .expect_find_by_id()
            .withf(|id| *id == AddressId::new(8))
            .returning(|_| Ok(Some(address(8, None, "Hamburg"))));

        let found = mocks
            .service()
            .get_address(AddressId::new(999), AddressType::Delivery)
            .await
            .unwrap();
        assert_eq!(found.id, AddressId::new(8));
    }

    #[tokio::test]
    async fn test_guest_get_of_unbindable_type_is_not_found() {
        let mut mocks = Mocks::guest();
        mocks.session.expect_get().never();

        let result = mocks
            .service()
            .get_address(AddressId::new(1), AddressType::Warehouse)
            .await;
        assert!(matches!(result, Err(CustomerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_guest_pointer_to_missing_address_is_not_found() {
        let mut mocks = Mocks::guest();
        mocks.session.expect_get().returning(|_| Ok(Some(json!(8))));
        mocks.addresses.expect_find_by_id().returning(|_| Ok(None));

        let service = mocks.service();
        assert!(matches!(
            service.get_address(AddressId::new(8), AddressType::Billing).await,
            Err(CustomerError::NotFound(_))
        ));
        assert!(
            service
                .list_addresses(Some(AddressType::Billing))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_malformed_pointer_counts_as_unset() {
        let mut mocks = Mocks::guest();
        mocks
            .session
            .expect_get()
            .returning(|_| Ok(Some(json!("eight"))));
        mocks.addresses.expect_find_by_id().never();

        let result = mocks
            .service()
            .get_address(AddressId::new(8), AddressType::Billing)
            .await;
        assert!(matches!(result, Err(CustomerError::NotFound(_))));
    }

    /// Session and free-standing store backed by shared in-memory state, so
    /// create/list/get sequences can be observed end to end.
    fn guest_with_memory(
        pointers: &Arc<Mutex<Vec<(String, Value)>>>,
        created: &Arc<Mutex<Vec<Address>>>,
    ) -> Mocks {
        let mut mocks = Mocks::guest();

        let read = Arc::clone(pointers);
        mocks.session.expect_get().returning(move |key| {
            Ok(read
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone()))
        });
        let write = Arc::clone(pointers);
        mocks.session.expect_set().returning(move |key, value| {
            write.lock().unwrap().push((key.to_string(), value));
            Ok(())
        });

        let next = Arc::clone(created);
        mocks.addresses.expect_create().returning(move |fields| {
            let mut created = next.lock().unwrap();
            let id = i32::try_from(created.len()).unwrap() + 1;
            let address = Address {
                id: AddressId::new(id),
                address_type: None,
                fields: fields.clone(),
            };
            created.push(address.clone());
            Ok(address)
        });
        let lookup = Arc::clone(created);
        mocks.addresses.expect_find_by_id().returning(move |id| {
            Ok(lookup.lock().unwrap().iter().find(|a| a.id == id).cloned())
        });

        mocks
    }

    #[tokio::test]
    async fn test_guest_create_binds_pointer_and_lists_it() {
        let pointers = Arc::new(Mutex::new(Vec::new()));
        let created = Arc::new(Mutex::new(Vec::new()));
        let mocks = guest_with_memory(&pointers, &created);
        let service = mocks.service();

        let billing = service
            .create_address(&fields("Berlin"), AddressType::Billing)
            .await
            .unwrap();

        let listed = service
            .list_addresses(Some(AddressType::Billing))
            .await
            .unwrap();
        assert_eq!(listed, vec![billing.clone()]);

        let last_pointer = pointers.lock().unwrap().last().cloned();
        assert_eq!(
            last_pointer,
            Some((
                session_keys::BILLING_ADDRESS_ID.to_string(),
                json!(billing.id.as_i32())
            ))
        );
    }

    #[tokio::test]
    async fn test_second_guest_billing_overwrites_pointer() {
        let pointers = Arc::new(Mutex::new(Vec::new()));
        let created = Arc::new(Mutex::new(Vec::new()));
        let mocks = guest_with_memory(&pointers, &created);
        let service = mocks.service();

        let first = service
            .create_address(&fields("Berlin"), AddressType::Billing)
            .await
            .unwrap();
        let second = service
            .create_address(&fields("Munich"), AddressType::Billing)
            .await
            .unwrap();

        let current = service
            .get_address(first.id, AddressType::Billing)
            .await
            .unwrap();
        assert_eq!(current, second);
        // The first record is orphaned, not deleted.
        assert_eq!(created.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_guest_create_of_other_type_binds_nothing() {
        let mut mocks = Mocks::guest();
        mocks
            .addresses
            .expect_create()
            .times(1)
            .returning(|f| {
                Ok(Address {
                    id: AddressId::new(4),
                    address_type: None,
                    fields: f.clone(),
                })
            });
        mocks.session.expect_set().never();

        let address = mocks
            .service()
            .create_address(&fields("Bonn"), AddressType::Sender)
            .await
            .unwrap();
        assert_eq!(address.id, AddressId::new(4));
    }

    #[tokio::test]
    async fn test_guest_list_without_type_is_empty() {
        let mut mocks = Mocks::guest();
        mocks.session.expect_get().never();

        let listed = mocks.service().list_addresses(None).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_guest_update_is_unsupported() {
        let mut mocks = Mocks::guest();
        mocks.contact_addresses.expect_update().never();

        let result = mocks
            .service()
            .update_address(AddressId::new(1), &fields("Kiel"), AddressType::Billing)
            .await;
        assert!(matches!(result, Err(CustomerError::Unsupported(_))));
    }

    #[tokio::test]
    async fn test_guest_delete_keeps_pointer() {
        let mut mocks = Mocks::guest();
        mocks
            .addresses
            .expect_delete()
            .withf(|id| *id == AddressId::new(3))
            .times(1)
            .returning(|_| Ok(()));
        mocks.session.expect_set().never();

        mocks
            .service()
            .delete_address(AddressId::new(3), AddressType::Billing)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_authenticated_list_delegates_with_type() {
        let mut mocks = Mocks::authenticated(42);
        mocks
            .contact_addresses
            .expect_list()
            .withf(|contact_id, address_type| {
                contact_id.as_i32() == 42 && *address_type == Some(AddressType::Warehouse)
            })
            .times(1)
            .returning(|_, _| Ok(vec![address(1, Some(AddressType::Warehouse), "Essen")]));
        mocks.session.expect_get().never();

        let listed = mocks
            .service()
            .list_addresses(Some(AddressType::Warehouse))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_authenticated_get_is_idempotent() {
        let mut mocks = Mocks::authenticated(42);
        mocks
            .contact_addresses
            .expect_get()
            .withf(|address_id, contact_id, address_type| {
                address_id.as_i32() == 5
                    && contact_id.as_i32() == 42
                    && *address_type == AddressType::Billing
            })
            .times(2)
            .returning(|_, _, _| Ok(Some(address(5, Some(AddressType::Billing), "Cologne"))));

        let service = mocks.service();
        let first = service
            .get_address(AddressId::new(5), AddressType::Billing)
            .await
            .unwrap();
        let second = service
            .get_address(AddressId::new(5), AddressType::Billing)
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_authenticated_get_missing_is_not_found() {
        let mut mocks = Mocks::authenticated(42);
        mocks
            .contact_addresses
            .expect_get()
            .returning(|_, _, _| Ok(None));

        let result = mocks
            .service()
            .get_address(AddressId::new(5), AddressType::Delivery)
            .await;
        assert!(matches!(result, Err(CustomerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_authenticated_create_update_delete_use_contact_store() {
        let mut mocks = Mocks::authenticated(42);
        mocks
            .contact_addresses
            .expect_create()
            .withf(|_, contact_id, address_type| {
                contact_id.as_i32() == 42 && *address_type == AddressType::Return
            })
            .times(1)
            .returning(|f, _, t| {
                Ok(Address {
                    id: AddressId::new(9),
                    address_type: Some(t),
                    fields: f.clone(),
                })
            });
        mocks
            .contact_addresses
            .expect_update()
            .withf(|f, address_id, contact_id, _| {
                f.city.as_deref() == Some("Leipzig")
                    && address_id.as_i32() == 9
                    && contact_id.as_i32() == 42
            })
            .times(1)
            .returning(|f, id, _, t| {
                Ok(Address {
                    id,
                    address_type: Some(t),
                    fields: f.clone(),
                })
            });
        mocks
            .contact_addresses
            .expect_delete()
            .times(1)
            .returning(|_, _, _| Ok(()));
        mocks.addresses.expect_create().never();
        mocks.addresses.expect_delete().never();
        mocks.session.expect_set().never();

        let service = mocks.service();
        let created = service
            .create_address(&fields("Dresden"), AddressType::Return)
            .await
            .unwrap();
        let updated = service
            .update_address(created.id, &fields("Leipzig"), AddressType::Return)
            .await
            .unwrap();
        assert_eq!(updated.fields.city.as_deref(), Some("Leipzig"));
        service
            .delete_address(created.id, AddressType::Return)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_store_failure_propagates_as_upstream() {
        let mut mocks = Mocks::authenticated(42);
        mocks
            .contact_addresses
            .expect_list()
            .returning(|_, _| Err(RepositoryError::DataCorruption("bad row".to_string())));

        let err = mocks.service().list_addresses(None).await.unwrap_err();
        assert!(err.is_upstream());
    }
}
