//! # Signature Errors
//!
//! Error types for signer recovery.

use thiserror::Error;

/// Errors that can occur while decoding a signature or recovering its signer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature string is not `0x`-prefixed hexadecimal.
    #[error("Invalid signature hex encoding")]
    InvalidHex,

    /// The decoded signature is neither 65 bytes nor 64-byte compact form.
    #[error("Invalid signature length: {0} bytes")]
    InvalidLength(usize),

    /// `v` is not 0, 1, 27, 28 or an EIP-155 value (35 and up).
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// R or S is zero or not below the curve order.
    #[error("Invalid signature format")]
    InvalidFormat,

    /// Signature has high S value (EIP-2 malleability protection)
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// Failed to recover public key from signature
    #[error("Failed to recover public key")]
    RecoveryFailed,

    /// The address string is not 20 hex bytes or fails its EIP-55 checksum.
    #[error("Invalid address")]
    InvalidAddress,
}
