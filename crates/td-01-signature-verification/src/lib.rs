//! # Signature Verification Subsystem (TD-01)
//!
//! Recovers the wallet address that signed a personal message.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Pure cryptographic logic, no I/O
//! - **Ports Layer** (`ports/`): Trait definitions for inbound interfaces
//! - **Service Layer** (`service.rs`): Wires domain logic to ports
//!
//! ## Conventions
//!
//! - **EIP-191**: messages are hashed with the `\x19Ethereum Signed Message:\n<len>` prefix
//! - **EIP-2**: signatures with high S values are rejected
//! - **EIP-2098**: 64-byte compact signatures are accepted alongside 65-byte ones
//! - **EIP-55**: addresses are rendered with the mixed-case checksum

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::ecdsa::{address_from_pubkey, keccak256, recover_address};
pub use domain::entities::{Address, Hash, RecoverableSignature, VerificationOutcome};
pub use domain::errors::SignatureError;
pub use domain::message::{
    encode_signature, hash_message, parse_signature, recover_signer, verify_signer,
    PERSONAL_MESSAGE_PREFIX,
};
pub use ports::inbound::MessageSignatureApi;
pub use service::SignatureVerificationService;

#[cfg(any(test, feature = "test-helpers"))]
pub use domain::ecdsa::test_helpers;
