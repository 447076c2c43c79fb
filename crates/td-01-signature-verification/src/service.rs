//! # Signature Verification Service
//!
//! Application service layer that implements the `MessageSignatureApi` trait
//! by delegating to the domain layer.

use crate::domain::ecdsa;
use crate::domain::entities::{Address, Hash, RecoverableSignature, VerificationOutcome};
use crate::domain::errors::SignatureError;
use crate::domain::message;
use crate::ports::inbound::MessageSignatureApi;
use tracing::debug;

/// Signature Verification Service.
///
/// Stateless; cheap to construct and share.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureVerificationService;

impl SignatureVerificationService {
    /// Create a new signature verification service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MessageSignatureApi for SignatureVerificationService {
    fn hash_message(&self, message: &[u8]) -> Hash {
        message::hash_message(message)
    }

    fn recover_address(
        &self,
        prehash: &Hash,
        signature: &RecoverableSignature,
    ) -> Result<Address, SignatureError> {
        ecdsa::recover_address(prehash, signature)
    }

    fn recover_signer(&self, message: &str, signature: &str) -> Result<Address, SignatureError> {
        message::recover_signer(message, signature)
    }

    fn verify_signer(&self, message: &str, signature: &str, expected: &str) -> VerificationOutcome {
        let outcome = message::verify_signer(message, signature, expected);
        debug!(expected, outcome = outcome.label(), "Signer verified");
        outcome
    }
}
