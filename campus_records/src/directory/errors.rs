//! Directory error types.

use thiserror::Error;

use crate::{net::ApiError, session::UserId, validation::ValidationError};

/// Directory errors
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Patch rejected locally
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Caller is not signed in as an admin; refused without a request
    #[error("Administrator access required")]
    Forbidden,

    /// Account not in the loaded directory
    #[error("User {0} is not in the directory")]
    UnknownUser(UserId),

    /// Boundary call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Snapshot could not be written
    #[error("Export failed: {0}")]
    Export(#[from] csv::Error),
}

impl DirectoryError {
    /// Whether the session token was rejected and the user must sign in again
    pub fn invalidates_session(&self) -> bool {
        matches!(self, DirectoryError::Api(err) if err.invalidates_session())
    }

    /// Local refusal or a 403 from the boundary
    pub fn is_forbidden(&self) -> bool {
        matches!(
            self,
            DirectoryError::Forbidden | DirectoryError::Api(ApiError::Forbidden)
        )
    }

    pub fn client_message(&self) -> String {
        match self {
            DirectoryError::Api(err) => err.client_message(),
            // Don't expose the account id
            DirectoryError::UnknownUser(_) => "User not found".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for directory operations
pub type DirectoryResult<T> = Result<T, DirectoryError>;
