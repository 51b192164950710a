//! Shared types for the auth core: the error taxonomy and the auth event
//! stream payloads.

pub mod errors;
pub mod events;

pub use errors::{AuthError, AuthResult, ProviderError};
pub use events::{AuthChange, AuthEvent};
