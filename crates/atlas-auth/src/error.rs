//! Authentication errors.

use thiserror::Error;

/// Errors raised at the session provider boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair rejected
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Sign-up for an email that already has an account
    #[error("an account already exists for {0}")]
    AccountExists(String),

    /// No active session
    #[error("not authenticated")]
    NotAuthenticated,

    /// Caller is not the administrator
    #[error("administrator privileges required")]
    NotAdministrator,

    /// Target account does not exist
    #[error("no account registered for {0}")]
    UnknownAccount(String),

    /// Credit amount must be positive
    #[error("invalid credit amount: {0}")]
    InvalidAmount(u32),

    /// Provider-side failure (network, backend function missing, ...)
    #[error("session provider error: {0}")]
    Provider(String),
}

/// Result type for authentication operations
pub type Result<T> = std::result::Result<T, AuthError>;
