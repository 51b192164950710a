//! Contract with the hosted auth backend.
//!
//! The backend is a trusted black box reachable only through this trait.
//! Successful credential operations do not return the resulting session;
//! the provider pushes a matching [`AuthChange`] on its event stream,
//! typically within a sub-second gap after the call resolves. Callers must
//! not assume the session store already reflects a success the instant the
//! future completes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::entities::{Profile, Session};
use crate::types::errors::ProviderError;
use crate::types::events::AuthChange;

pub mod mock;

pub use mock::MockAuthProvider;

/// Result type for provider calls
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Metadata attached to a sign-up request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpMetadata {
    /// Display name to record on the new account
    pub display_name: Option<String>,
}

/// Backend auth provider contract.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Attempt to restore a previously persisted session.
    async fn restore_session(&self) -> ProviderResult<Option<Session>>;

    /// Authenticate with email and password.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> ProviderResult<()>;

    /// Create a new account.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignUpMetadata,
    ) -> ProviderResult<()>;

    /// Revoke the current session.
    async fn sign_out(&self) -> ProviderResult<()>;

    /// Request a password-recovery email.
    async fn reset_password_for_email(&self, email: &str) -> ProviderResult<()>;

    /// Change the password of the currently authenticated user.
    async fn update_user_password(&self, new_password: &str) -> ProviderResult<()>;

    /// Load the application profile for a user.
    async fn fetch_profile(&self, user_id: &str) -> ProviderResult<Profile>;

    /// Subscribe to session lifecycle events. Dropping the receiver
    /// unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<AuthChange>;
}
