//! Global application error types and handlers.
//!
//! This module defines the error taxonomy shared by the identity and matcher
//! subsystems. Authentication and authorization failures always surface to the
//! caller; audit-log and notifier failures are downgraded to warnings by the
//! services that hit them.

use thiserror::Error;

/// Generic service error used across the core subsystems.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Username already taken: {username}")]
    DuplicateUsername { username: String },

    #[error("Email already registered: {email}")]
    DuplicateEmail { email: String },

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Please verify your email before signing in")]
    NotVerified,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Access denied: this section requires {level} access")]
    Unauthorized { level: String },

    #[error("Record store error: {source}")]
    Store {
        #[from]
        source: anyhow::Error,
    },

    #[error("Notifier error: {message}")]
    Notifier { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    // Helper constructors for common patterns

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn duplicate_username(username: impl Into<String>) -> Self {
        Self::DuplicateUsername {
            username: username.into(),
        }
    }

    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }

    pub fn unauthorized(level: impl Into<String>) -> Self {
        Self::Unauthorized {
            level: level.into(),
        }
    }

    pub fn notifier(message: impl Into<String>) -> Self {
        Self::Notifier {
            message: message.into(),
        }
    }
}
