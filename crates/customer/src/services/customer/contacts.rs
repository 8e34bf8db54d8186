//! Contact record access.

use storefront_customer_core::Identity;

use super::CustomerService;
use crate::error::{CustomerError, Result};
use crate::models::{Contact, ContactUpdate, CustomerOverview, NewContact};

impl CustomerService<'_> {
    /// Create a contact without logging it in.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the contact store fails.
    pub async fn create_contact(&self, new_contact: &NewContact) -> Result<Contact> {
        Ok(self.contacts.create(new_contact).await?)
    }

    /// The logged-in contact, `None` for guests.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the contact store fails.
    pub async fn get_contact(&self) -> Result<Option<Contact>> {
        match self.identity().await {
            Identity::Authenticated(contact_id) => Ok(self.contacts.find_by_id(contact_id).await?),
            Identity::Guest => Ok(None),
        }
    }

    /// Update the logged-in contact.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::Unsupported` for guests, `CustomerError::NotFound`
    /// if the contact no longer exists.
    pub async fn update_contact(&self, update: &ContactUpdate) -> Result<Contact> {
        let Identity::Authenticated(contact_id) = self.identity().await else {
            return Err(CustomerError::Unsupported(
                "guests have no contact record".to_string(),
            ));
        };

        let contact = self.contacts.update(update, contact_id).await?;
        tracing::debug!(%contact_id, "Updated contact");
        Ok(contact)
    }

    /// The logged-in contact with all of its addresses.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if a store fails.
    pub async fn customer_overview(&self) -> Result<Option<CustomerOverview>> {
        let Some(contact) = self.get_contact().await? else {
            return Ok(None);
        };
        let addresses = self.list_addresses(None).await?;

        Ok(Some(CustomerOverview { contact, addresses }))
    }
}
