//! Customer-layer error handling with Sentry integration.
//!
//! Every customer service operation returns [`Result`]. Collaborator failures
//! are wrapped unchanged; callers behind axum can return the error directly
//! since it implements `IntoResponse`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::ports::SessionError;
use crate::services::auth::AuthError;

/// Error type of the customer service.
#[derive(Debug, Error)]
pub enum CustomerError {
    /// The address or contact does not exist in the applicable store, or the
    /// guest session holds no pointer for the requested type.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation has no defined behavior for the current identity mode.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// A persistence collaborator failed.
    #[error("Repository error: {0}")]
    Repository(#[source] RepositoryError),

    /// The session store failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The login collaborator failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

impl CustomerError {
    /// Whether this is a collaborator failure passed through unchanged.
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::Repository(_) | Self::Session(_) | Self::Auth(_))
    }
}

impl From<RepositoryError> for CustomerError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("record".to_string()),
            other => Self::Repository(other),
        }
    }
}

impl IntoResponse for CustomerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unsupported(_) => StatusCode::FORBIDDEN,
            Self::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Auth(AuthError::InvalidCredentials | AuthError::ContactNotFound) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Session(_) => StatusCode::BAD_GATEWAY,
            Self::Repository(_) | Self::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Customer request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::NotFound(_) | Self::Unsupported(_) => self.to_string(),
            Self::Repository(RepositoryError::Conflict(_)) => {
                "An account with this email already exists".to_string()
            }
            Self::Auth(AuthError::InvalidCredentials | AuthError::ContactNotFound) => {
                "Invalid credentials".to_string()
            }
            Self::Session(_) => "Session unavailable, please try again".to_string(),
            Self::Repository(_) | Self::Auth(_) => "Internal server error".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `CustomerError`.
pub type Result<T> = std::result::Result<T, CustomerError>;

/// Set the Sentry user context from a contact ID.
///
/// Call this after successful authentication to associate errors with contacts.
pub fn set_sentry_user(contact_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(contact_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}
