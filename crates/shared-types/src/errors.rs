//! # Error Types
//!
//! Errors raised while parsing shared entity values.

use thiserror::Error;

/// A string could not be parsed as a [`crate::UserId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid user id: {input}")]
pub struct InvalidUserId {
    /// The rejected input.
    pub input: String,
}
