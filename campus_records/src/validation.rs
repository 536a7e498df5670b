//! Local input validation.
//!
//! Everything in here runs before a request is built, so a `ValidationError`
//! never reaches the remote API.

use thiserror::Error;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Input rejected locally before any network call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was empty
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Email is not syntactically valid
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Password shorter than the minimum
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    /// Numeric field outside its allowed range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    /// Amount below zero
    #[error("{0} cannot be negative")]
    Negative(&'static str),

    /// Grade not in the letter-grade table
    #[error("Unknown grade '{0}'")]
    UnknownGrade(String),

    /// Value not accepted for an enumerated field
    #[error("Invalid {field}: '{value}'")]
    InvalidChoice { field: &'static str, value: String },

    /// Email already used by another account
    #[error("Email already in use: {0}")]
    DuplicateEmail(String),
}

/// Result type for validation helpers
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Reject a value that is empty after trimming.
pub fn require(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

/// Syntactic email check: `local@domain.tld`, no whitespace, one `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !domain.starts_with('.'),
        None => false,
    }
}

/// Validate an email, returning the trimmed address.
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField("email"));
    }
    if !is_valid_email(trimmed) {
        return Err(ValidationError::InvalidEmail(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("ada@university.edu"));
        assert!(is_valid_email("john.doe+cs@dept.example.org"));
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "",
            "plainaddress",
            "@university.edu",
            "ada@",
            "ada@localhost",
            "ada@.edu",
            "ada@uni.",
            "ada lovelace@uni.edu",
            "ada@@uni.edu",
        ] {
            assert!(!is_valid_email(email), "{email} should be rejected");
        }
    }

    #[test]
    fn test_validate_email_trims() {
        assert_eq!(
            validate_email("  ada@uni.edu ").unwrap(),
            "ada@uni.edu".to_string()
        );
        assert_eq!(
            validate_email("   ").unwrap_err(),
            ValidationError::MissingField("email")
        );
    }

    #[test]
    fn test_require() {
        assert!(require("name", "Data Structures").is_ok());
        assert_eq!(
            require("name", "  ").unwrap_err(),
            ValidationError::MissingField("name")
        );
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::OutOfRange {
            field: "credit hours",
            min: 1,
            max: 6,
            value: 9,
        };
        assert_eq!(err.to_string(), "credit hours must be between 1 and 6, got 9");
    }
}
