//! Ed25519 verification of incoming interaction requests.
//!
//! Discord signs `timestamp ++ body` with the application's key and sends the
//! hex signature in `X-Signature-Ed25519`. Unsigned or mis-signed requests
//! must be rejected.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use thiserror::Error;

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("invalid public key: {0}")]
    InvalidKey(String),

    #[error("malformed signature: {0}")]
    Malformed(String),

    #[error("signature does not match request")]
    Mismatch,
}

#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: VerifyingKey,
}

impl SignatureVerifier {
    pub fn from_hex(public_key: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(public_key.trim())
            .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
        let bytes: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            SignatureError::InvalidKey(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        let key = VerifyingKey::from_bytes(&bytes)
            .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
        Ok(Self { key })
    }

    pub fn verify(
        &self,
        timestamp: &str,
        body: &[u8],
        signature_hex: &str,
    ) -> Result<(), SignatureError> {
        let bytes =
            hex::decode(signature_hex).map_err(|e| SignatureError::Malformed(e.to_string()))?;
        let bytes: [u8; 64] = bytes.as_slice().try_into().map_err(|_| {
            SignatureError::Malformed(format!("expected 64 bytes, got {}", bytes.len()))
        })?;
        let signature = Signature::from_bytes(&bytes);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        self.key
            .verify(&message, &signature)
            .map_err(|_| SignatureError::Mismatch)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use ed25519_dalek::{Signer, SigningKey};

    use super::*;

    pub(crate) fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[7u8; 32])
    }

    pub(crate) fn sign(key: &SigningKey, timestamp: &str, body: &[u8]) -> String {
        let mut message = timestamp.as_bytes().to_vec();
        message.extend_from_slice(body);
        hex::encode(key.sign(&message).to_bytes())
    }

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::from_hex(&hex::encode(signing_key().verifying_key().to_bytes())).unwrap()
    }

    #[test]
    fn test_valid_signature_is_accepted() {
        let body = br#"{"type":1}"#;
        let signature = sign(&signing_key(), "1700000000", body);
        assert!(verifier().verify("1700000000", body, &signature).is_ok());
    }

    #[test]
    fn test_tampered_body_is_rejected() {
        let signature = sign(&signing_key(), "1700000000", br#"{"type":1}"#);
        let err = verifier()
            .verify("1700000000", br#"{"type":2}"#, &signature)
            .unwrap_err();
        assert!(matches!(err, SignatureError::Mismatch));
    }

    #[test]
    fn test_different_timestamp_is_rejected() {
        let body = br#"{"type":1}"#;
        let signature = sign(&signing_key(), "1700000000", body);
        assert!(matches!(
            verifier().verify("1700000001", body, &signature),
            Err(SignatureError::Mismatch)
        ));
    }

    #[test]
    fn test_non_hex_signature_is_malformed() {
        assert!(matches!(
            verifier().verify("1700000000", b"{}", "not-hex"),
            Err(SignatureError::Malformed(_))
        ));
    }

    #[test]
    fn test_short_signature_is_malformed() {
        assert!(matches!(
            verifier().verify("1700000000", b"{}", "abcd"),
            Err(SignatureError::Malformed(_))
        ));
    }

    #[test]
    fn test_bad_public_key_is_rejected() {
        assert!(matches!(
            SignatureVerifier::from_hex("zz"),
            Err(SignatureError::InvalidKey(_))
        ));
        assert!(matches!(
            SignatureVerifier::from_hex("abcd"),
            Err(SignatureError::InvalidKey(_))
        ));
    }
}
