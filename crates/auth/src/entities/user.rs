use serde::{Deserialize, Serialize};

/// Authenticated identity as reported by the backend provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Provider-issued user identifier
    pub id: String,
    /// Primary email address, if the provider shared one
    pub email: Option<String>,
    /// Display name chosen at sign-up
    pub display_name: Option<String>,
}
