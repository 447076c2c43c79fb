//! # Personal Messages (EIP-191)
//!
//! Hashing and signature decoding for `personal_sign` style messages, and the
//! signer checks built on them.

use super::ecdsa::{keccak256, recover_address};
use super::entities::{Address, Hash, RecoverableSignature, VerificationOutcome};
use super::errors::SignatureError;

/// Prefix prepended to every personal message before hashing.
pub const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Hash a personal message: `keccak256(prefix || decimal(len) || message)`.
pub fn hash_message(message: &[u8]) -> Hash {
    let mut data = Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + 20 + message.len());
    data.extend_from_slice(PERSONAL_MESSAGE_PREFIX.as_bytes());
    data.extend_from_slice(message.len().to_string().as_bytes());
    data.extend_from_slice(message);
    keccak256(&data)
}

/// Decode a `0x`-prefixed hex signature.
///
/// Accepts 65-byte `r || s || v` and 64-byte EIP-2098 compact
/// `r || yParityAndS`. The returned `v` is always 27 or 28.
pub fn parse_signature(signature: &str) -> Result<RecoverableSignature, SignatureError> {
    let digits = signature
        .strip_prefix("0x")
        .or_else(|| signature.strip_prefix("0X"))
        .ok_or(SignatureError::InvalidHex)?;
    let bytes = hex::decode(digits).map_err(|_| SignatureError::InvalidHex)?;

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    match bytes.len() {
        65 => {
            r.copy_from_slice(&bytes[..32]);
            s.copy_from_slice(&bytes[32..64]);
            let v = normalize_v(bytes[64])?;
            Ok(RecoverableSignature { r, s, v })
        }
        64 => {
            r.copy_from_slice(&bytes[..32]);
            s.copy_from_slice(&bytes[32..]);
            let y_parity = s[0] >> 7;
            s[0] &= 0x7f;
            Ok(RecoverableSignature {
                r,
                s,
                v: 27 + y_parity,
            })
        }
        n => Err(SignatureError::InvalidLength(n)),
    }
}

/// Map a wire `v` to 27 or 28.
///
/// EIP-155 values (`35 + 2 * chain_id + parity`) carry the parity in their
/// low bit: odd is 27, even is 28.
fn normalize_v(v: u8) -> Result<u8, SignatureError> {
    match v {
        0 | 27 => Ok(27),
        1 | 28 => Ok(28),
        35.. => Ok(if v & 1 == 1 { 27 } else { 28 }),
        _ => Err(SignatureError::InvalidRecoveryId(v)),
    }
}

/// Encode a signature as `0x`-prefixed 65-byte hex.
pub fn encode_signature(signature: &RecoverableSignature) -> String {
    let mut bytes = Vec::with_capacity(65);
    bytes.extend_from_slice(&signature.r);
    bytes.extend_from_slice(&signature.s);
    bytes.push(signature.v);
    format!("0x{}", hex::encode(bytes))
}

/// Recover the address that signed `message` as a personal message.
pub fn recover_signer(message: &str, signature: &str) -> Result<Address, SignatureError> {
    let signature = parse_signature(signature)?;
    recover_address(&hash_message(message.as_bytes()), &signature)
}

/// Check that `expected` signed `message`.
///
/// The comparison is on the checksummed string, so `expected` must be given in
/// its EIP-55 form to match.
pub fn verify_signer(message: &str, signature: &str, expected: &str) -> VerificationOutcome {
    match recover_signer(message, signature) {
        Ok(signer) if signer.to_checksum() == expected => VerificationOutcome::Valid { signer },
        Ok(recovered) => VerificationOutcome::Invalid { recovered },
        Err(e) => VerificationOutcome::VerificationFailed(e),
    }
}
