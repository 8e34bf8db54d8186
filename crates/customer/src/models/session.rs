//! Session-related types.
//!
//! The session is the only memory a guest has; a logged-in contact is
//! identified by [`CurrentContact`].

use serde::{Deserialize, Serialize};

use storefront_customer_core::{AddressType, ContactId, Email};

/// Session-stored contact identity.
///
/// Minimal data stored in the session to identify the logged-in contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentContact {
    /// Contact's database ID.
    pub id: ContactId,
    /// Contact's email address.
    pub email: Email,
}

/// Session keys for customer data.
pub mod session_keys {
    use super::AddressType;

    /// Key for storing the current logged-in contact.
    pub const CURRENT_CONTACT: &str = "current_contact";

    /// Key holding the guest's current billing address id.
    pub const BILLING_ADDRESS_ID: &str = "billingAddressId";

    /// Key holding the guest's current delivery address id.
    pub const DELIVERY_ADDRESS_ID: &str = "deliveryAddressId";

    /// The pointer key for a guest-bindable address type.
    #[must_use]
    pub const fn address_pointer(address_type: AddressType) -> Option<&'static str> {
        match address_type {
            AddressType::Billing => Some(BILLING_ADDRESS_ID),
            AddressType::Delivery => Some(DELIVERY_ADDRESS_ID),
            AddressType::Sender
            | AddressType::Return
            | AddressType::Client
            | AddressType::Contractor
            | AddressType::Warehouse => None,
        }
    }
}
