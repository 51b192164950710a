//! Internal utilities for the auth core.

pub mod validation;

pub use validation::*;
