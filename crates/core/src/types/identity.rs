//! Shopper identity.

use serde::{Deserialize, Serialize};

use super::ContactId;

/// Who the current shopper is.
///
/// A shopper is either a registered contact that logged in, or a guest
/// whose only memory is the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", content = "contact_id", rename_all = "snake_case")]
pub enum Identity {
    /// A logged-in contact.
    Authenticated(ContactId),
    /// A shopper without an account.
    Guest,
}

impl Identity {
    /// Build an identity from a possibly-unassigned contact id.
    ///
    /// `None`, zero and negative ids all mean "guest".
    #[must_use]
    pub fn from_contact_id(contact_id: Option<ContactId>) -> Self {
        match contact_id {
            Some(id) if id.is_assigned() => Self::Authenticated(id),
            _ => Self::Guest,
        }
    }

    /// The contact id, if authenticated.
    #[must_use]
    pub const fn contact_id(&self) -> Option<ContactId> {
        match self {
            Self::Authenticated(id) => Some(*id),
            Self::Guest => None,
        }
    }

    /// Integer view: the contact id, or `0` for guests.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        match self {
            Self::Authenticated(id) => id.as_i32(),
            Self::Guest => 0,
        }
    }

    /// Whether the shopper is a guest.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        matches!(self, Self::Guest)
    }
}
