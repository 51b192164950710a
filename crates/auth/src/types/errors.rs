//! Error taxonomy for the auth core.
//!
//! Validation errors are local and never reach the backend; provider errors
//! are classified by known message substrings with a generic fallback;
//! timeouts are kept distinct so the user is told to retry rather than told
//! their input was wrong.

use thiserror::Error;

/// Failure reported by the backend auth provider.
///
/// The provider is a black box; its failures carry only a message, and any
/// classification happens on our side by substring matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors surfaced to pages by auth operations and the recovery flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account with this email already exists")]
    AlreadyRegistered,

    #[error("email address has not been confirmed")]
    EmailNotConfirmed,

    #[error("authentication service error: {0}")]
    Provider(String),

    #[error("the request timed out, please try again")]
    Timeout,

    #[error("recovery link expired")]
    LinkExpired,
}

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Classify a provider failure by its known message substrings.
    /// Unrecognized messages fall back to the generic provider variant.
    pub fn from_provider(error: ProviderError) -> Self {
        let lowered = error.message.to_ascii_lowercase();
        if lowered.contains("invalid login credentials") || lowered.contains("invalid credentials")
        {
            AuthError::InvalidCredentials
        } else if lowered.contains("already registered") || lowered.contains("already exists") {
            AuthError::AlreadyRegistered
        } else if lowered.contains("not confirmed") {
            AuthError::EmailNotConfirmed
        } else {
            AuthError::Provider(error.message)
        }
    }
}

impl From<ProviderError> for AuthError {
    fn from(error: ProviderError) -> Self {
        AuthError::from_provider(error)
    }
}
