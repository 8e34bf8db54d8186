//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur while logging a contact in.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong password (or an unreadable stored hash).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The contact does not exist.
    #[error("contact not found")]
    ContactNotFound,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Session could not be updated.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
