//! Bearer credential model and the shared credential store.

pub mod credential;
pub mod secret;

pub use credential::*;
pub use secret::*;
