//! Shared fixtures: wallets that sign like a browser extension and a fully
//! wired in-memory service.

use k256::ecdsa::SigningKey;
use serde_json::{json, Value};

use account_runtime::adapters::InMemoryKVStore;
use account_runtime::{AppConfig, ServiceContainer};
use td_01_signature_verification::test_helpers::{generate_keypair, sign};
use td_01_signature_verification::{address_from_pubkey, encode_signature, hash_message};
use td_02_user_accounts::DEFAULT_LOGIN_CHALLENGE;

/// A secp256k1 key and its EIP-55 address.
pub struct Wallet {
    key: SigningKey,
    pub address: String,
}

impl Wallet {
    pub fn random() -> Self {
        let (key, verifying_key) = generate_keypair();
        let address = address_from_pubkey(&verifying_key).to_checksum();
        Self { key, address }
    }

    /// Sign `message` as a personal message, returning 65-byte hex.
    pub fn sign(&self, message: &str) -> String {
        encode_signature(&sign(&hash_message(message.as_bytes()), &self.key))
    }

    /// Sign the default login challenge.
    pub fn sign_login(&self) -> String {
        self.sign(DEFAULT_LOGIN_CHALLENGE)
    }
}

/// Flip one bit in the byte at `index` of a hex signature.
pub fn flip_byte(signature: &str, index: usize) -> String {
    let mut bytes = hex::decode(signature.trim_start_matches("0x")).unwrap();
    bytes[index] ^= 0x01;
    format!("0x{}", hex::encode(bytes))
}

/// Container over an in-memory store with default configuration.
pub fn container() -> ServiceContainer {
    ServiceContainer::with_store(AppConfig::default(), InMemoryKVStore::new())
}

/// Link-account request body.
pub fn link_body(address: &str, signature: &str, user_id: &str) -> Value {
    json!({
        "address": address,
        "signature": signature,
        "userId": user_id,
    })
}
