//! Centralized error handling.
//!
//! Provides a unified error type for the whole crate. Every variant is a
//! deterministic, caller-facing rejection: a field plus a reason, never a
//! silently corrected input and never a retryable fault.

use serde::Serialize;
use thiserror::Error;

use crate::infra::StoreError;

/// Identity error taxonomy.
#[derive(Error, Debug)]
pub enum IdentityError {
    // Registration validation
    #[error("Passwords don't match")]
    PasswordMismatch,

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(u64),

    #[error("Username is already taken")]
    DuplicateUsername,

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Email address is not valid")]
    InvalidEmailFormat,

    #[error("{0}")]
    Validation(String),

    // Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access denied")]
    Forbidden,

    // Resource errors
    #[error("Identity not found")]
    NotFound,

    // Storage layer (non-uniqueness failures pass through untranslated)
    #[error("Storage error")]
    Store(StoreError),

    // Internal
    #[error("Internal error")]
    Internal(String),
}

impl IdentityError {
    /// Stable machine-readable code for the caller.
    pub fn code(&self) -> &'static str {
        match self {
            IdentityError::PasswordMismatch => "PASSWORD_MISMATCH",
            IdentityError::PasswordTooShort(_) => "PASSWORD_TOO_SHORT",
            IdentityError::DuplicateUsername => "DUPLICATE_USERNAME",
            IdentityError::DuplicateEmail => "DUPLICATE_EMAIL",
            IdentityError::InvalidEmailFormat => "INVALID_EMAIL_FORMAT",
            IdentityError::Validation(_) => "VALIDATION_ERROR",
            IdentityError::Unauthorized => "UNAUTHORIZED",
            IdentityError::InvalidCredentials => "INVALID_CREDENTIALS",
            IdentityError::Forbidden => "FORBIDDEN",
            IdentityError::NotFound => "NOT_FOUND",
            IdentityError::Store(_) => "STORAGE_ERROR",
            IdentityError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Offending input field, where the failure is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            IdentityError::PasswordMismatch => Some("password_confirm"),
            IdentityError::PasswordTooShort(_) => Some("password"),
            IdentityError::DuplicateUsername => Some("username"),
            IdentityError::DuplicateEmail => Some("email"),
            IdentityError::InvalidEmailFormat => Some("email"),
            _ => None,
        }
    }

    /// Message safe to show the caller (hides internal details).
    pub fn user_message(&self) -> String {
        match self {
            IdentityError::Store(e) => {
                tracing::error!("Storage error: {:?}", e);
                "A storage error occurred".to_string()
            }
            IdentityError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Structured rejection body for the presentation layer.
    pub fn to_rejection(&self) -> Rejection {
        Rejection {
            code: self.code(),
            field: self.field(),
            message: self.user_message(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        IdentityError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        IdentityError::Internal(msg.into())
    }
}

/// Serializable rejection: field + reason, the only shape callers ever see.
#[derive(Debug, Serialize)]
pub struct Rejection {
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    pub message: String,
}

/// Result type alias
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Extension trait for Option -> IdentityError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> IdentityResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> IdentityResult<T> {
        self.ok_or(IdentityError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_carries_field_and_code() {
        let rejection = IdentityError::DuplicateUsername.to_rejection();
        assert_eq!(rejection.code, "DUPLICATE_USERNAME");
        assert_eq!(rejection.field, Some("username"));
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = IdentityError::internal("connection pool exhausted");
        assert_eq!(err.user_message(), "An internal error occurred");
    }
}
