//! Core services of the auth crate.
//!
//! The session store is the single mutable resource: it is updated only by
//! its own event-stream task and by the explicit clear/sign-out calls.
//! Everything else reads snapshots and subscribes.

pub mod auth_operations;
pub mod recovery_flow;
pub mod recovery_link;
pub mod session_store;

pub use auth_operations::AuthOperations;
pub use recovery_flow::{Destination, Navigator, RecoveryFlowCoordinator, RecoveryFlowState};
pub use recovery_link::{fragment_is_recovery_link, RecoveryLinkSnapshot};
pub use session_store::{AuthState, SessionStore};
