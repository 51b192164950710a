use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::user::AuthUser;

/// Live authenticated-identity handle pushed by the backend provider.
///
/// The credential material is opaque to this crate; it is carried only so
/// the provider can hand a complete session across the event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The identity this session belongs to
    pub user: AuthUser,
    /// Opaque backend-issued credential material
    pub access_token: String,
    /// Session expiration timestamp
    pub expires_at: DateTime<Utc>,
}
