//! Password authentication.
//!
//! Hashing happens when a contact is created; [`PasswordLogin`] verifies the
//! stored hash and records the contact in the session.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tower_sessions::Session;

use storefront_customer_core::ContactId;

use crate::error::set_sentry_user;
use crate::models::{CurrentContact, session_keys};
use crate::ports::{ContactCredentials, ContactLogin};

/// Session-backed login by contact id and password.
pub struct PasswordLogin<'a> {
    credentials: &'a dyn ContactCredentials,
    session: &'a Session,
}

impl<'a> PasswordLogin<'a> {
    /// Create a login bound to one request's session.
    #[must_use]
    pub const fn new(credentials: &'a dyn ContactCredentials, session: &'a Session) -> Self {
        Self {
            credentials,
            session,
        }
    }
}

#[async_trait]
impl ContactLogin for PasswordLogin<'_> {
    async fn login_with_contact_id(
        &self,
        contact_id: ContactId,
        password: &SecretString,
    ) -> Result<(), AuthError> {
        let (contact, password_hash) = self
            .credentials
            .password_hash(contact_id)
            .await?
            .ok_or(AuthError::ContactNotFound)?;

        verify_password(password.expose_secret(), &password_hash)?;

        // New session id on privilege change
        self.session.cycle_id().await?;
        self.session
            .insert(
                session_keys::CURRENT_CONTACT,
                CurrentContact {
                    id: contact.id,
                    email: contact.email.clone(),
                },
            )
            .await?;

        set_sentry_user(&contact.id, Some(contact.email.as_str()));
        tracing::info!(contact_id = %contact.id, "Contact logged in");
        Ok(())
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password does not match or
/// the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
