//! Stateless wrappers around backend auth calls.
//!
//! Inputs are trimmed and checked locally before anything reaches the
//! provider; provider failures are classified into the crate's error
//! taxonomy. These wrappers never mutate the session store; on success the
//! provider's own event stream drives the corresponding store transition,
//! typically within a sub-second gap after the call resolves.

use std::sync::Arc;

use gather_config::AuthConfig;
use tracing::debug;

use crate::provider::{AuthProvider, SignUpMetadata};
use crate::types::errors::{AuthError, AuthResult};
use crate::utils::validation::{validate_email, validate_password};

/// Operation set exposed to pages for credential handling.
#[derive(Clone)]
pub struct AuthOperations {
    provider: Arc<dyn AuthProvider>,
    password_min_length: usize,
}

impl AuthOperations {
    pub fn new(provider: Arc<dyn AuthProvider>, config: &AuthConfig) -> Self {
        Self {
            provider,
            password_min_length: config.password_min_length,
        }
    }

    pub fn password_min_length(&self) -> usize {
        self.password_min_length
    }

    /// Authenticate with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<()> {
        let email = email.trim();
        validate_email(email)?;
        if password.is_empty() {
            return Err(AuthError::Validation("password is required".to_string()));
        }
        self.provider.sign_in_with_password(email, password).await?;
        debug!(email, "sign-in accepted, awaiting provider event");
        Ok(())
    }

    /// Create a new account.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AuthResult<()> {
        let email = email.trim();
        let display_name = display_name.trim();
        validate_email(email)?;
        validate_password(password, self.password_min_length)?;
        let metadata = SignUpMetadata {
            display_name: (!display_name.is_empty()).then(|| display_name.to_string()),
        };
        self.provider.sign_up(email, password, metadata).await?;
        debug!(email, "sign-up accepted, awaiting provider event");
        Ok(())
    }

    /// Revoke the current session.
    pub async fn sign_out(&self) -> AuthResult<()> {
        self.provider.sign_out().await?;
        Ok(())
    }

    /// Request a password-recovery email.
    pub async fn reset_password_for_email(&self, email: &str) -> AuthResult<()> {
        let email = email.trim();
        validate_email(email)?;
        self.provider.reset_password_for_email(email).await?;
        debug!(email, "recovery email requested");
        Ok(())
    }

    /// Change the password of the currently authenticated user.
    pub async fn update_password(&self, new_password: &str) -> AuthResult<()> {
        validate_password(new_password, self.password_min_length)?;
        self.provider.update_user_password(new_password).await?;
        debug!("password updated");
        Ok(())
    }
}
