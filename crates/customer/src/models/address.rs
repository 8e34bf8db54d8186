//! Postal address models.

use serde::{Deserialize, Serialize};

use storefront_customer_core::{AddressId, AddressType};

/// Address fields as submitted by the shopper.
///
/// The customer layer treats these as opaque; validation belongs to the
/// address store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AddressFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    /// Province or state code.
    pub province_code: Option<String>,
    /// Postal/ZIP code.
    pub zip: Option<String>,
    /// Country code (ISO 3166-1 alpha-2).
    pub country_code: Option<String>,
    pub phone: Option<String>,
}

impl AddressFields {
    /// Whether every field is missing or blank.
    ///
    /// Registration treats an empty submission as "no address given".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.company,
            &self.address1,
            &self.address2,
            &self.city,
            &self.province_code,
            &self.zip,
            &self.country_code,
            &self.phone,
        ]
        .into_iter()
        .all(|field| field.as_deref().is_none_or(|v| v.trim().is_empty()))
    }

    /// `None` for an empty submission, the fields otherwise.
    #[must_use]
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }
}

/// A stored postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Address {
    pub id: AddressId,
    /// Role of a contact-bound address; `None` for free-standing (guest) records.
    pub address_type: Option<AddressType>,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fields: AddressFields,
}
