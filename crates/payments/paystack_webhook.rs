//! Paystack webhook signature verification.
//!
//! Paystack signs the raw request body with HMAC-SHA512 keyed by the account
//! secret key and sends the lowercase hex digest in `x-paystack-signature`.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use thiserror::Error;

type HmacSha512 = Hmac<Sha512>;

pub const PAYSTACK_SIGNATURE_HEADER: &str = "x-paystack-signature";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("webhook secret is not configured")]
    MissingSecret,
    #[error("signature header is missing")]
    MissingSignature,
    #[error("signature does not match payload")]
    InvalidSignature,
}

pub struct PaystackWebhookVerifier {
    secret: String,
}

impl PaystackWebhookVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.secret.trim().is_empty()
    }

    /// Checks `signature` against the HMAC of the exact bytes received.
    /// The payload must not be re-serialized before calling this.
    pub fn verify(&self, payload: &[u8], signature: Option<&str>) -> Result<(), SignatureError> {
        if !self.is_configured() {
            return Err(SignatureError::MissingSecret);
        }

        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(SignatureError::MissingSignature)?;

        let provided = hex::decode(signature).map_err(|_| SignatureError::InvalidSignature)?;

        let mut mac = HmacSha512::new_from_slice(self.secret.as_bytes())
            .map_err(|_| SignatureError::MissingSecret)?;
        mac.update(payload);

        // verify_slice compares in constant time
        mac.verify_slice(&provided)
            .map_err(|_| SignatureError::InvalidSignature)
    }

    /// Lowercase hex digest Paystack would send for `payload`.
    pub fn sign(&self, payload: &[u8]) -> Result<String, SignatureError> {
        if !self.is_configured() {
            return Err(SignatureError::MissingSecret);
        }

        let mut mac = HmacSha512::new_from_slice(self.secret.as_bytes())
            .map_err(|_| SignatureError::MissingSecret)?;
        mac.update(payload);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}
