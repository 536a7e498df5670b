//! Session error types.

use thiserror::Error;

use crate::{net::ApiError, storage::StorageError, validation::ValidationError};

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Form input rejected before any request
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Email/password pair rejected by the server
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Operation needs a signed-in user
    #[error("Not signed in")]
    NotAuthenticated,

    /// Boundary call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Token could not be persisted or cleared
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// Whether the held token was rejected
    pub fn invalidates_session(&self) -> bool {
        matches!(self, SessionError::Api(err) if err.invalidates_session())
    }

    pub fn client_message(&self) -> String {
        match self {
            SessionError::Api(err) => err.client_message(),
            // Local file paths stay out of prompts
            SessionError::Storage(_) => "Could not save your session on this device".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
