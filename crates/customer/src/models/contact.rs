//! Contact (registered shopper) models.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use storefront_customer_core::{ContactId, Email};

use super::Address;

/// A registered shopper account.
///
/// The password hash stays in the contact table and is never loaded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    /// Storage-assigned ID. Zero when creation did not produce a usable contact.
    pub id: ContactId,
    /// Login email.
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Get the contact's full name.
    #[must_use]
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        }
    }
}

/// Registration input for a new contact.
///
/// The plaintext password is consumed once: the contact store hashes it and
/// the login step verifies against that hash.
#[derive(Debug, Clone)]
pub struct NewContact {
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: SecretString,
}

/// Changes to an existing contact. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A contact together with all of its addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerOverview {
    pub contact: Contact,
    pub addresses: Vec<Address>,
}
