//! Auth event stream payloads.
//!
//! Events are transient notifications pushed by the backend provider on
//! session lifecycle changes; nothing in this crate persists them.

use serde::{Deserialize, Serialize};

use crate::entities::Session;

/// Session lifecycle notification pushed by the backend provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEvent {
    /// A session was established
    SignedIn,
    /// The session was revoked
    SignedOut,
    /// Credential material was refreshed for an existing session
    TokenRefreshed,
    /// A session was established through a password-recovery link
    PasswordRecovery,
}

/// An auth event together with the session it refers to, as delivered on
/// the provider's event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthChange {
    /// What happened
    pub event: AuthEvent,
    /// The session after the change, absent on sign-out
    pub session: Option<Session>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_snake_case() {
        let json = serde_json::to_string(&AuthEvent::PasswordRecovery).expect("serialize");
        assert_eq!(json, "\"password_recovery\"");

        let json = serde_json::to_string(&AuthEvent::TokenRefreshed).expect("serialize");
        assert_eq!(json, "\"token_refreshed\"");
    }
}
