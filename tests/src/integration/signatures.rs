//! # Signer Recovery Vectors
//!
//! Known keys and addresses, malleability and compact encodings, exercised
//! through TD-01's public API only.

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use k256::ecdsa::SigningKey;
    use td_01_signature_verification::domain::ecdsa::invert_s;
    use td_01_signature_verification::test_helpers::sign;
    use td_01_signature_verification::{
        encode_signature, hash_message, parse_signature, recover_signer, verify_signer, Address,
        SignatureError, VerificationOutcome,
    };

    use crate::integration::fixtures::{flip_byte, Wallet};

    const KNOWN_KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
    const KNOWN_ADDRESS: &str = "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23";

    fn known_key() -> SigningKey {
        SigningKey::from_slice(&hex::decode(KNOWN_KEY).unwrap()).unwrap()
    }

    #[test]
    fn test_eip55_vectors() {
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let lower = expected.to_lowercase();
            let address = Address::from_str(&lower).unwrap();
            assert_eq!(address.to_checksum(), expected);
            assert_eq!(Address::from_str(expected).unwrap(), address);
        }
    }

    #[test]
    fn test_bad_checksum_rejected() {
        // Case of the first letter flipped.
        let err = Address::from_str("0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap_err();
        assert_eq!(err, SignatureError::InvalidAddress);
    }

    #[test]
    fn test_known_key_signs_as_known_address() {
        let signature = encode_signature(&sign(&hash_message(b"Trustdrops login"), &known_key()));

        let signer = recover_signer("Trustdrops login", &signature).unwrap();
        assert_eq!(signer.to_checksum(), KNOWN_ADDRESS);
        assert!(verify_signer("Trustdrops login", &signature, KNOWN_ADDRESS).is_valid());
    }

    #[test]
    fn test_lowercase_claim_does_not_match() {
        let signature = encode_signature(&sign(&hash_message(b"Trustdrops login"), &known_key()));

        let outcome = verify_signer(
            "Trustdrops login",
            &signature,
            &KNOWN_ADDRESS.to_lowercase(),
        );
        assert!(matches!(outcome, VerificationOutcome::Invalid { .. }));
    }

    #[test]
    fn test_high_s_rejected() {
        let wallet = Wallet::random();
        let mut signature = parse_signature(&wallet.sign_login()).unwrap();
        signature.s = invert_s(&signature.s);
        signature.v = if signature.v == 27 { 28 } else { 27 };

        let err = recover_signer("Trustdrops login", &encode_signature(&signature)).unwrap_err();
        assert_eq!(err, SignatureError::MalleableSignature);
    }

    #[test]
    fn test_compact_signature_recovers_same_signer() {
        let wallet = Wallet::random();
        let full = parse_signature(&wallet.sign_login()).unwrap();

        let mut compact = Vec::with_capacity(64);
        compact.extend_from_slice(&full.r);
        compact.extend_from_slice(&full.s);
        if full.v == 28 {
            compact[32] |= 0x80;
        }

        let signer =
            recover_signer("Trustdrops login", &format!("0x{}", hex::encode(compact))).unwrap();
        assert_eq!(signer.to_checksum(), wallet.address);
    }

    #[test]
    fn test_dropping_v_of_even_parity_signature_stays_valid() {
        // Low s leaves the top bit clear, so the 64-byte remainder reads as
        // compact form with parity 0, which is exactly v = 27.
        let wallet = (0..64)
            .map(|_| Wallet::random())
            .find(|wallet| parse_signature(&wallet.sign_login()).unwrap().v == 27)
            .expect("a parity-0 signature within 64 keys");
        let signature = wallet.sign_login();
        let truncated = &signature[..signature.len() - 2];

        let signer = recover_signer("Trustdrops login", truncated).unwrap();
        assert_eq!(signer.to_checksum(), wallet.address);
        assert!(verify_signer("Trustdrops login", truncated, &wallet.address).is_valid());
    }

    #[test]
    fn test_unprefixed_signature_rejected() {
        let wallet = Wallet::random();
        let signature = wallet.sign_login();

        assert_eq!(
            verify_signer("Trustdrops login", &signature[2..], &wallet.address),
            VerificationOutcome::VerificationFailed(SignatureError::InvalidHex)
        );
    }

    #[test]
    fn test_eip155_v_accepted() {
        let wallet = Wallet::random();
        let mut bytes = hex::decode(&wallet.sign_login()[2..]).unwrap();
        bytes[64] = if bytes[64] == 27 { 37 } else { 38 };

        let signer =
            recover_signer("Trustdrops login", &format!("0x{}", hex::encode(bytes))).unwrap();
        assert_eq!(signer.to_checksum(), wallet.address);
    }

    #[test]
    fn test_tampered_signature_never_validates() {
        let wallet = Wallet::random();
        let signature = wallet.sign_login();

        for index in [0, 17, 31, 40, 63] {
            let tampered = flip_byte(&signature, index);
            let outcome = verify_signer("Trustdrops login", &tampered, &wallet.address);
            assert!(!outcome.is_valid(), "byte {index} flip still valid");
        }
    }

    #[test]
    fn test_malformed_inputs() {
        assert_eq!(
            recover_signer("Trustdrops login", "").unwrap_err(),
            SignatureError::InvalidHex
        );
        assert_eq!(
            recover_signer("Trustdrops login", "0xzz").unwrap_err(),
            SignatureError::InvalidHex
        );
        assert_eq!(
            recover_signer("Trustdrops login", &format!("0x{}", "11".repeat(30))).unwrap_err(),
            SignatureError::InvalidLength(30)
        );

        let wallet = Wallet::random();
        let mut bytes = hex::decode(wallet.sign_login().trim_start_matches("0x")).unwrap();
        bytes[64] = 5;
        assert_eq!(
            recover_signer("Trustdrops login", &format!("0x{}", hex::encode(bytes))).unwrap_err(),
            SignatureError::InvalidRecoveryId(5)
        );
    }
}
