//! # Gather Auth Core
//!
//! Session state and password-recovery flow coordination for the Gather
//! web front-end. This crate decides, at any instant, whether there is a
//! valid session and whether the current visit is a password-recovery flow,
//! despite several independent racing signals: a URL fragment present only
//! on first page load, a backend-pushed event stream that may fire late or
//! never, and user-initiated network operations with timeouts.
//!
//! ## Architecture
//!
//! - **Entities**: domain models (AuthUser, Session, Profile)
//! - **Provider**: the backend auth contract and a scriptable mock
//! - **Services**: session store, operation wrappers, recovery-link
//!   detection, and the recovery flow state machine
//! - **Types**: auth events and the error taxonomy
//! - **Utils**: input validation
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use gather_auth::{MockAuthProvider, SessionStore};
//!
//! # async fn demo() {
//! let provider = Arc::new(MockAuthProvider::new());
//! let store = SessionStore::start(provider);
//! let state = store.current();
//! assert!(state.loading);
//! # }
//! ```

pub mod entities;
pub mod provider;
pub mod services;
pub mod types;
pub mod utils;

pub use entities::{AuthUser, Profile, Session};
pub use provider::{AuthProvider, MockAuthProvider, ProviderResult, SignUpMetadata};
pub use services::auth_operations::AuthOperations;
pub use services::recovery_flow::{
    Destination, Navigator, RecoveryFlowCoordinator, RecoveryFlowState,
};
pub use services::recovery_link::{fragment_is_recovery_link, RecoveryLinkSnapshot};
pub use services::session_store::{AuthState, SessionStore};
pub use types::errors::{AuthError, AuthResult, ProviderError};
pub use types::events::{AuthChange, AuthEvent};
