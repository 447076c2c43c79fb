//! # Inbound Ports (Driving Ports / API)
//!
//! The public API of the account service.

use crate::domain::entities::{NewUser, UserPatch};
use crate::domain::errors::AccountError;
use async_trait::async_trait;
use serde_json::Value;
use shared_types::User;

/// Identity linking & verification API.
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait UserAccountApi: Send + Sync {
    /// Insert a new user.
    ///
    /// Any persistence failure, including a duplicate address, surfaces as
    /// the generic `"User was not created!"` validation error.
    async fn create(&self, user: NewUser) -> Result<User, AccountError>;

    /// Look up by id. A malformed id is reported as absent.
    async fn read_by_id(&self, id: &str) -> Option<User>;

    /// Look up by wallet address.
    async fn read(&self, address: &str) -> Option<User>;

    /// Look up by linked Twitter id.
    async fn read_by_twitter_id(&self, twitter_id: &str) -> Option<User>;

    /// Apply `patch` to the record whose address is `user.address`.
    ///
    /// A missing record or a uniqueness violation surfaces as the generic
    /// `"User was not updated!"` validation error.
    async fn update(&self, user: &User, patch: UserPatch) -> Result<bool, AccountError>;

    /// Whether `address` signed the login challenge. Never fails; any
    /// verification error yields `false`.
    async fn is_signature_valid(&self, address: &str, signature: &str) -> bool;

    /// Hand `user` to the transaction queue without waiting for the outcome.
    async fn queue_approval(&self, user: &User);

    /// Validate a link request, verify its signature, link the Twitter id to
    /// the address and queue an approval.
    async fn link_account(&self, body: &Value) -> Result<User, AccountError>;
}
