//! Error types for sign-in operations
//!
//! This module defines the failures that can occur while delegating sign-in
//! to an identity provider, exchanging its token for a session credential,
//! and provisioning the user's profile document.

use thiserror::Error;

/// Sign-in error types.
///
/// Every external failure seen by the session orchestrator is folded into
/// one of these variants before it reaches the session store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Identity provider runtime is missing or out of date
    #[error("Identity provider services unavailable: {0}")]
    ServiceUnavailable(String),

    /// User dismissed the delegated sign-in
    #[error("Sign-in cancelled by user")]
    Cancelled,

    /// Delegated sign-in failed on the provider side
    #[error("Provider error: {0}")]
    Provider(String),

    /// Credential exchange or session establishment failed
    #[error("Credential exchange failed: {0}")]
    Exchange(String),

    /// Profile existence check or write failed
    #[error("Profile store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for sign-in operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Whether the failure should be surfaced to the user.
    ///
    /// Cancellation is the only silent outcome.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, AuthError::Cancelled)
    }

    /// Whether retrying the same operation might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::Exchange(_) | AuthError::Store(_))
    }

    /// Get a stable error code for logs and analytics.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            AuthError::Cancelled => "CANCELLED",
            AuthError::Provider(_) => "PROVIDER_ERROR",
            AuthError::Exchange(_) => "EXCHANGE_ERROR",
            AuthError::Store(_) => "STORE_ERROR",
            AuthError::Config(_) => "CONFIG_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_is_silent() {
        assert!(!AuthError::Cancelled.is_user_visible());
        assert!(AuthError::Provider("boom".into()).is_user_visible());
        assert!(AuthError::ServiceUnavailable("outdated".into()).is_user_visible());
    }

    #[test]
    fn test_transient_errors() {
        assert!(AuthError::Store("timeout".into()).is_transient());
        assert!(AuthError::Exchange("network".into()).is_transient());
        assert!(!AuthError::Config("missing client id".into()).is_transient());
    }

    #[test]
    fn test_error_codes_and_messages() {
        let err = AuthError::Exchange("token expired".into());
        assert_eq!(err.error_code(), "EXCHANGE_ERROR");
        assert_eq!(err.to_string(), "Credential exchange failed: token expired");
    }
}
