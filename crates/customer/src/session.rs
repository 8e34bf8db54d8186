//! tower-sessions adapter for the session collaborators.

use async_trait::async_trait;
use serde_json::Value;
use tower_sessions::Session;

use storefront_customer_core::ContactId;

use crate::models::{CurrentContact, session_keys};
use crate::ports::{SessionError, SessionStore, UserSession};

/// One shopper's `tower_sessions::Session`, seen through the customer ports.
#[derive(Debug, Clone)]
pub struct TowerSessionStore {
    session: Session,
}

impl TowerSessionStore {
    /// Wrap the request's session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// The wrapped session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Remove the logged-in contact from the session (logout).
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn clear_current_contact(&self) -> Result<(), SessionError> {
        self.session
            .remove::<CurrentContact>(session_keys::CURRENT_CONTACT)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for TowerSessionStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, SessionError> {
        Ok(self.session.get_value(key).await?)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), SessionError> {
        self.session.insert_value(key, value).await?;
        Ok(())
    }
}

#[async_trait]
impl UserSession for TowerSessionStore {
    async fn current_contact_id(&self) -> Option<ContactId> {
        match self
            .session
            .get::<CurrentContact>(session_keys::CURRENT_CONTACT)
            .await
        {
            Ok(current) => current.map(|c| c.id),
            Err(err) => {
                tracing::warn!(error = %err, "Unreadable session, treating shopper as guest");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use tower_sessions::MemoryStore;

    use storefront_customer_core::Email;

    use super::*;

    fn store() -> TowerSessionStore {
        TowerSessionStore::new(Session::new(None, Arc::new(MemoryStore::default()), None))
    }

    #[tokio::test]
    async fn test_pointer_round_trip() {
        let store = store();
        assert_eq!(store.get(session_keys::BILLING_ADDRESS_ID).await.unwrap(), None);

        store
            .set(session_keys::BILLING_ADDRESS_ID, json!(12))
            .await
            .unwrap();
        store
            .set(session_keys::BILLING_ADDRESS_ID, json!(13))
            .await
            .unwrap();

        assert_eq!(
            store.get(session_keys::BILLING_ADDRESS_ID).await.unwrap(),
            Some(json!(13))
        );
        assert_eq!(store.get(session_keys::DELIVERY_ADDRESS_ID).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_guest_session_has_no_contact() {
        assert_eq!(store().current_contact_id().await, None);
    }

    #[tokio::test]
    async fn test_current_contact_is_read_and_cleared() {
        let store = store();
        store
            .session()
            .insert(
                session_keys::CURRENT_CONTACT,
                CurrentContact {
                    id: ContactId::new(42),
                    email: Email::parse("jane@example.com").unwrap(),
                },
            )
            .await
            .unwrap();

        assert_eq!(store.current_contact_id().await, Some(ContactId::new(42)));

        store.clear_current_contact().await.unwrap();
        assert_eq!(store.current_contact_id().await, None);
    }

    #[tokio::test]
    async fn test_malformed_contact_entry_counts_as_guest() {
        let store = store();
        store
            .set(session_keys::CURRENT_CONTACT, json!("not a contact"))
            .await
            .unwrap();
        assert_eq!(store.current_contact_id().await, None);
    }
}
