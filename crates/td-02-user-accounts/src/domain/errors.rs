//! # Error Types
//!
//! `AccountError` is what callers see. Everything else is internal and only
//! ever logged.

use thiserror::Error;

/// Message returned when a create fails for any reason.
pub const USER_NOT_CREATED: &str = "User was not created!";

/// Message returned when an update fails for any reason.
pub const USER_NOT_UPDATED: &str = "User was not updated!";

/// Errors surfaced by the account service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// Bad input or a failed write. The message never carries the cause.
    #[error("{message}")]
    Validation {
        /// Client-facing message.
        message: String,
    },

    /// The signature was not produced by the claimed address.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The Twitter account is already linked to a different address.
    #[error("Twitter account is already linked to another address")]
    AlreadyLinked,
}

impl AccountError {
    /// Build a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// HTTP status code equivalent.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::InvalidSignature => 401,
            Self::AlreadyLinked => 409,
        }
    }

    /// Short, stable name used as a log field and metric label.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::InvalidSignature => "invalid_signature",
            Self::AlreadyLinked => "already_linked",
        }
    }
}

/// Key-value store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    Io { message: String },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    Corruption { message: String },
}

/// Persistence errors from a [`crate::ports::outbound::UserRepository`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// No record matched the filter.
    #[error("No user matched {field} = {value}")]
    NotFound { field: &'static str, value: String },

    /// Another user already has this address.
    #[error("Address already registered: {0}")]
    DuplicateAddress(String),

    /// Another user already has this Twitter id.
    #[error("Twitter id already linked: {0}")]
    DuplicateTwitterId(String),

    /// Underlying store failure.
    #[error(transparent)]
    Storage(#[from] KVStoreError),

    /// A stored document could not be encoded or decoded.
    #[error("User document serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// The signature verifier could not produce a signer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Signature verification failed: {reason}")]
pub struct VerifierError {
    /// Why recovery failed.
    pub reason: String,
}

/// The approval could not be handed to the transaction queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Nobody was listening for the request.
    #[error("Approval request was not delivered to any consumer")]
    Undelivered,

    /// The queue refused the request.
    #[error("Transaction queue rejected the request: {0}")]
    Rejected(String),
}
