//! Signer recovery backed by TD-01.

use td_01_signature_verification::{MessageSignatureApi, SignatureVerificationService};
use td_02_user_accounts::{SignatureVerifier, VerifierError};
use tracing::debug;
use trustdrops_telemetry::{metric_inc, time_histogram, SIGNATURE_VERIFICATIONS};

/// Implements the account service's `SignatureVerifier` port with TD-01.
///
/// Every call is timed and counted as `recovered` or `failed`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SignatureAdapter {
    service: SignatureVerificationService,
}

impl SignatureAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SignatureVerifier for SignatureAdapter {
    fn recover_signer(&self, message: &str, signature: &str) -> Result<String, VerifierError> {
        let _timer = time_histogram!(trustdrops_telemetry::SIGNATURE_DURATION);

        match self.service.recover_signer(message, signature) {
            Ok(address) => {
                metric_inc!(SIGNATURE_VERIFICATIONS, &["recovered"]);
                Ok(address.to_checksum())
            }
            Err(e) => {
                metric_inc!(SIGNATURE_VERIFICATIONS, &["failed"]);
                debug!(error = %e, "Signer recovery failed");
                Err(VerifierError {
                    reason: e.to_string(),
                })
            }
        }
    }
}
