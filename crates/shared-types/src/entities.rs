//! # Core Domain Entities
//!
//! The account document and its identifier.
//!
//! ## Invariants
//!
//! - At most one `User` per `address`.
//! - At most one `User` per `twitter_id`.
//! - `id` is assigned at creation and is immutable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::InvalidUserId;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

const HYPHENATED_LEN: usize = 36;

/// Opaque unique identifier of a user document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for UserId {
    type Err = InvalidUserId;

    /// Only the 36-character hyphenated form is accepted; braced, URN and
    /// simple encodings are rejected, as is surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidUserId {
            input: s.to_string(),
        };
        if s.len() != HYPHENATED_LEN {
            return Err(invalid());
        }
        Uuid::parse_str(s).map(Self).map_err(|_| invalid())
    }
}

/// A user account.
///
/// Serialized with camelCase field names so the stored document matches the
/// shape clients already consume (`twitterId`, `createdAt`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Assigned at creation, immutable.
    pub id: UserId,
    /// Wallet address in the representation the client supplied.
    pub address: String,
    /// Linked Twitter account identifier, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_id: Option<String>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last modification time.
    pub updated_at: Timestamp,
}

impl User {
    /// Whether a Twitter identity is linked to this account.
    #[must_use]
    pub fn is_twitter_linked(&self) -> bool {
        self.twitter_id.is_some()
    }
}
