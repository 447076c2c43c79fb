//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this subsystem.

use crate::domain::entities::{Address, Hash, RecoverableSignature, VerificationOutcome};
use crate::domain::errors::SignatureError;

/// Personal-message signature API.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait MessageSignatureApi: Send + Sync {
    /// Hash a message with the personal-message prefix (EIP-191).
    fn hash_message(&self, message: &[u8]) -> Hash;

    /// Recover the signer's address from a prehashed message.
    ///
    /// # Security
    /// - Rejects signatures with high S values (EIP-2 malleability protection)
    fn recover_address(
        &self,
        prehash: &Hash,
        signature: &RecoverableSignature,
    ) -> Result<Address, SignatureError>;

    /// Recover the address that signed `message`, given a hex signature.
    fn recover_signer(&self, message: &str, signature: &str) -> Result<Address, SignatureError>;

    /// Check that the EIP-55 address `expected` signed `message`.
    fn verify_signer(&self, message: &str, signature: &str, expected: &str)
        -> VerificationOutcome;
}
