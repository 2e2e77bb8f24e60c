//! Shared types for the OAuth doctor workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
