//! # Domain Entities
//!
//! Write payloads, lookup filters and the result of a signature check.

use serde::{Deserialize, Serialize};

/// Fields supplied when creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Wallet address, stored as given.
    pub address: String,
    /// Twitter account to link at creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_id: Option<String>,
}

impl NewUser {
    /// A user with only a wallet address.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            twitter_id: None,
        }
    }

    /// Link a Twitter account at creation time.
    #[must_use]
    pub fn with_twitter_id(mut self, twitter_id: impl Into<String>) -> Self {
        self.twitter_id = Some(twitter_id.into());
        self
    }
}

/// Partial update applied to an existing user.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    /// New Twitter account id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_id: Option<String>,
}

impl UserPatch {
    /// Patch that links a Twitter account.
    #[must_use]
    pub fn twitter_id(twitter_id: impl Into<String>) -> Self {
        Self {
            twitter_id: Some(twitter_id.into()),
        }
    }

    /// Whether applying this patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.twitter_id.is_none()
    }
}

/// Single-field lookup filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserFilter {
    /// Match on wallet address (exact).
    Address(String),
    /// Match on linked Twitter id (exact).
    TwitterId(String),
}

impl UserFilter {
    /// Field name, for logs.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Address(_) => "address",
            Self::TwitterId(_) => "twitterId",
        }
    }

    /// The value being matched.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Address(v) | Self::TwitterId(v) => v,
        }
    }
}

/// Outcome of checking a login signature against a claimed address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureCheck {
    /// The claimed address produced the signature.
    Valid {
        /// The recovered signer.
        signer: String,
    },
    /// The signature recovers to a different address.
    Mismatch {
        /// The address that actually signed.
        recovered: String,
    },
    /// The signature could not be decoded or recovered.
    Failed {
        /// Why verification failed.
        reason: String,
    },
}

impl SignatureCheck {
    /// Collapse to the boolean answer; anything but `Valid` denies.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}
