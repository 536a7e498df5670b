//! Boundary error types.

use thiserror::Error;

/// Errors reported by the remote records API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Email/password pair rejected at login
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Bearer token missing, expired or revoked
    #[error("Session expired, please sign in again")]
    Unauthorized,

    /// Caller lacks the role for the operation
    #[error("Access denied")]
    Forbidden,

    /// Resource does not exist
    #[error("Not found")]
    NotFound,

    /// 5xx response
    #[error("Server unavailable (status {0})")]
    ServerUnavailable(u16),

    /// No response received
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// Request exceeded its time budget
    #[error("Request timed out")]
    Timeout,

    /// Any other 4xx, carrying the server's message
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            500..=599 => ApiError::ServerUnavailable(status),
            _ => ApiError::Rejected {
                status,
                message: message.unwrap_or_else(|| "Request failed".to_string()),
            },
        }
    }

    /// Whether the held token can no longer be used.
    pub fn invalidates_session(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Whether the user may sensibly retry by hand.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::NetworkUnavailable(_) | ApiError::Timeout | ApiError::ServerUnavailable(_)
        )
    }

    /// Message suitable for a user-facing prompt
    ///
    /// Transport details are dropped; the server's own message is kept for
    /// rejected requests.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::NetworkUnavailable(_) => {
                "Cannot reach the server. Check your connection and try again".to_string()
            }
            ApiError::ServerUnavailable(_) => {
                "The server is unavailable. Please try again later".to_string()
            }
            ApiError::Timeout => {
                "The server took too long to respond. It may be starting up, please try again"
                    .to_string()
            }
            ApiError::Rejected { message, .. } => message.clone(),
            ApiError::Malformed(_) => "Unexpected response from the server".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for boundary calls
pub type ApiResult<T> = Result<T, ApiError>;
