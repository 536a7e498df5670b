//! Course record error types.

use thiserror::Error;

use super::models::CourseId;
use crate::validation::ValidationError;

/// Course record errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordsError {
    /// Draft or update rejected locally
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No course with this id
    #[error("Course {0} not found")]
    CourseNotFound(CourseId),
}

impl RecordsError {
    pub fn client_message(&self) -> String {
        self.to_string()
    }
}

/// Result type for course record operations
pub type RecordsResult<T> = Result<T, RecordsError>;
