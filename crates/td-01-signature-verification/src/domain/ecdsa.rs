//! # secp256k1 Signer Recovery
//!
//! Turns a 32-byte prehash plus `(r, s, v)` into the address that produced
//! it. Only low-s signatures (EIP-2) are accepted, so every message/signer
//! pair has exactly one valid encoding.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::elliptic_curve::PrimeField;
use k256::Scalar;
use sha3::{Digest, Keccak256};
use subtle::{Choice, ConstantTimeGreater, ConstantTimeLess};

use super::entities::{Address, Hash, RecoverableSignature};
use super::errors::SignatureError;

/// `(n - 1) / 2` for the secp256k1 group order `n`; the largest low `s`.
const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Recover the signer of `prehash`.
///
/// Rejects, in this order: `r` or `s` outside `[1, n-1]`, high `s`, a `v`
/// other than 0, 1, 27 or 28, and points that do not recover.
pub fn recover_address(
    prehash: &Hash,
    signature: &RecoverableSignature,
) -> Result<Address, SignatureError> {
    let sig = Signature::from_scalars(signature.r, signature.s)
        .map_err(|_| SignatureError::InvalidFormat)?;

    if !is_low_s(&signature.s) {
        return Err(SignatureError::MalleableSignature);
    }

    let recovery_id = parse_recovery_id(signature.v)?;

    VerifyingKey::recover_from_prehash(prehash, &sig, recovery_id)
        .map(|key| address_from_pubkey(&key))
        .map_err(|_| SignatureError::RecoveryFailed)
}

pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Last 20 bytes of the Keccak-256 of the uncompressed point, without its
/// `0x04` tag.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let point = public_key.to_encoded_point(false);
    let digest = keccak256(&point.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    Address(address)
}

/// `s <= (n - 1) / 2`, compared in constant time.
pub(crate) fn is_low_s(s: &[u8; 32]) -> bool {
    let mut decided = Choice::from(0u8);
    let mut above = Choice::from(0u8);

    // Big-endian: the first differing byte settles it.
    for (byte, limit) in s.iter().zip(HALF_ORDER.iter()) {
        let greater = byte.ct_gt(limit);
        let less = byte.ct_lt(limit);
        above |= !decided & greater;
        decided |= greater | less;
    }

    !bool::from(above)
}

/// Accepts both raw parity (0, 1) and the Ethereum offset form (27, 28).
pub(crate) fn parse_recovery_id(v: u8) -> Result<RecoveryId, SignatureError> {
    let parity = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(SignatureError::InvalidRecoveryId(v)),
    };
    RecoveryId::from_byte(parity).ok_or(SignatureError::InvalidRecoveryId(v))
}

/// `n - s`, the other member of the malleable pair. Out-of-range input comes
/// back unchanged.
pub fn invert_s(s: &[u8; 32]) -> [u8; 32] {
    let scalar: Option<Scalar> = Scalar::from_repr((*s).into()).into();
    let Some(scalar) = scalar else {
        return *s;
    };

    let mut inverted = [0u8; 32];
    inverted.copy_from_slice(&(-scalar).to_bytes());
    inverted
}

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use super::*;
    use k256::ecdsa::SigningKey;

    pub fn generate_keypair() -> (SigningKey, VerifyingKey) {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        let verifying_key = *signing_key.verifying_key();
        (signing_key, verifying_key)
    }

    /// Sign like a wallet does: low `s`, `v` in {27, 28}.
    pub fn sign(prehash: &Hash, private_key: &SigningKey) -> RecoverableSignature {
        let (sig, recid) = private_key
            .sign_prehash_recoverable(prehash)
            .expect("prehash signing");

        let (sig, recid) = match sig.normalize_s() {
            // Negating s mirrors the point, flipping its parity.
            Some(low) => (low, recid.to_byte() ^ 1),
            None => (sig, recid.to_byte()),
        };

        let bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        RecoverableSignature { r, s, v: recid + 27 }
    }
}
