//! Contact registration.

use storefront_customer_core::AddressType;

use super::CustomerService;
use crate::error::{Result, add_breadcrumb};
use crate::models::{AddressFields, Contact, NewContact};

impl CustomerService<'_> {
    /// Register a new contact, log it in and store its initial addresses.
    ///
    /// Billing data without delivery data is stored twice, once per type.
    /// Empty address submissions count as absent. The contact is not rolled
    /// back if an address fails to save.
    ///
    /// Identity must still be unresolved when this runs, so the addresses end
    /// up bound to the freshly logged-in contact.
    ///
    /// # Errors
    ///
    /// Returns the first collaborator failure. Address failures surface after
    /// the contact already exists.
    pub async fn register_customer(
        &self,
        new_contact: NewContact,
        billing: Option<AddressFields>,
        delivery: Option<AddressFields>,
    ) -> Result<Contact> {
        let billing = billing.and_then(AddressFields::non_empty);
        let delivery = delivery.and_then(AddressFields::non_empty);

        let contact = self.contacts.create(&new_contact).await?;
        add_breadcrumb(
            "customer",
            "Contact registered",
            &[("contact_id", &contact.id.to_string())],
        );

        if contact.id.is_assigned() {
            self.login
                .login_with_contact_id(contact.id, &new_contact.password)
                .await?;
        } else {
            tracing::warn!(email = %contact.email, "Contact creation returned no id, skipping login");
        }

        if let Some(billing) = &billing {
            self.create_address(billing, AddressType::Billing).await?;
            if delivery.is_none() {
                self.create_address(billing, AddressType::Delivery).await?;
            }
        }

        if let Some(delivery) = &delivery {
            self.create_address(delivery, AddressType::Delivery).await?;
        }

        tracing::info!(
            contact_id = %contact.id,
            with_billing = billing.is_some(),
            with_delivery = delivery.is_some(),
            "Customer registered"
        );

        Ok(contact)
    }
}
