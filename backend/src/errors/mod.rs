//! Global application error types.
//!
//! This module defines the custom error taxonomy used across the entire
//! backend application and provides helper constructors for consistent
//! error creation at the service layer.

use thiserror::Error;

/// Domain errors shared by services, handlers, and the auth guard.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Password too short to be stored.
    #[error("password is too short")]
    WeakPassword,

    /// Stored credential did not match the supplied password.
    #[error("wrong email or password")]
    InvalidPassword,

    /// Malformed, forged, expired, or mis-scoped bearer token. The cases
    /// are deliberately indistinguishable to the caller.
    #[error("invalid token")]
    InvalidToken,

    /// No credential was presented at all.
    #[error("authorization required")]
    Unauthorized,

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("database error: {source}")]
    Database {
        #[from]
        source: anyhow::Error,
    },

    #[error("internal error: {message}")]
    Internal { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    // Helper constructors for common patterns

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
