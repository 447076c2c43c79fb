//! # Domain Entities
//!
//! Core data structures for signer recovery.

use super::ecdsa::keccak256;
use super::errors::SignatureError;
use std::fmt;
use std::str::FromStr;

/// 32-byte digest (Keccak256 output).
pub type Hash = [u8; 32];

/// Ethereum-style address derived from public key (last 20 bytes of keccak256(pubkey))
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Raw address bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Render as a `0x`-prefixed EIP-55 mixed-case checksum string.
    #[must_use]
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Address {
    type Err = SignatureError;

    /// Parse a hex address, `0x` prefix optional.
    ///
    /// All-lowercase and all-uppercase inputs are accepted as-is; mixed-case
    /// input must carry a valid EIP-55 checksum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != 40 {
            return Err(SignatureError::InvalidAddress);
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| SignatureError::InvalidAddress)?;
        let address = Self(bytes);

        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum()[2..] != *digits {
            return Err(SignatureError::InvalidAddress);
        }

        Ok(address)
    }
}

/// ECDSA signature on the secp256k1 curve with its recovery id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    /// R component (32 bytes)
    pub r: [u8; 32],
    /// S component (32 bytes)
    pub s: [u8; 32],
    /// Recovery ID (0, 1, 27, or 28)
    pub v: u8,
}

/// Result of checking a signature against a claimed signer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The recovered signer is the claimed address.
    Valid {
        /// The recovered signer.
        signer: Address,
    },
    /// Recovery succeeded but produced a different address.
    Invalid {
        /// The address that actually signed.
        recovered: Address,
    },
    /// The signature could not be decoded or recovered.
    VerificationFailed(SignatureError),
}

impl VerificationOutcome {
    /// Whether the claimed signer produced the signature.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Short, stable name used as a log field and metric label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Valid { .. } => "valid",
            Self::Invalid { .. } => "invalid",
            Self::VerificationFailed(_) => "failed",
        }
    }
}
