//! Lazy, once-per-instance identity resolution.

use tokio::sync::OnceCell;

use storefront_customer_core::Identity;

use crate::ports::UserSession;

/// Resolves the shopper's identity on first use and keeps it.
///
/// The session is consulted at most once per resolver, so every operation of
/// one request sees the same identity even if the session changes meanwhile.
pub struct IdentityResolver<'a> {
    user_session: &'a dyn UserSession,
    resolved: OnceCell<Identity>,
}

impl<'a> IdentityResolver<'a> {
    /// Create an unresolved resolver.
    #[must_use]
    pub fn new(user_session: &'a dyn UserSession) -> Self {
        Self {
            user_session,
            resolved: OnceCell::new(),
        }
    }

    /// The shopper's identity.
    pub async fn identity(&self) -> Identity {
        *self
            .resolved
            .get_or_init(|| async {
                let identity =
                    Identity::from_contact_id(self.user_session.current_contact_id().await);
                tracing::debug!(contact_id = identity.as_i32(), "Resolved shopper identity");
                identity
            })
            .await
    }

    /// The contact id, `0` for guests.
    pub async fn contact_id(&self) -> i32 {
        self.identity().await.as_i32()
    }

    /// Whether the session has already been consulted.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.initialized()
    }
}
