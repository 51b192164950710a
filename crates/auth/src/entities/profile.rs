use serde::{Deserialize, Serialize};

/// Application-level record keyed by user id, loaded alongside the session.
///
/// A missing profile means "unknown", never "logged out": the identity in
/// the session stays valid even when this lookup fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// User this profile belongs to
    pub user_id: String,
    /// Whether the user has finished onboarding
    pub onboarding_completed: bool,
    /// Public display name, if set
    pub display_name: Option<String>,
}
