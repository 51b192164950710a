//! Domain entities for the auth core.
//!
//! Sessions are replaced wholesale on every auth event and never mutated in
//! place; profiles are looked up by user id, not embedded in the session.

pub mod profile;
pub mod session;
pub mod user;

pub use profile::Profile;
pub use session::Session;
pub use user::AuthUser;
