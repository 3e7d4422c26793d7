//! # Signature Errors

use shared_crypto::CryptoError;
use thiserror::Error;

/// Errors raised when checking signed material.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature does not verify under the expected key.
    #[error("Signature verification failed")]
    SignatureInvalid,

    /// Bytes do not decode to a usable Ed25519 public key.
    #[error("Invalid public key")]
    InvalidKey,

    /// Secret key material could not be loaded.
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// A certificate failed validation.
    #[error("Certificate for {subject:?} rejected: {reason}")]
    CertificateInvalid { subject: String, reason: String },

    /// An attestation was issued by a key other than the trusted one.
    #[error("Attestation signed by an untrusted key")]
    UntrustedAttester,
}

impl From<CryptoError> for SignatureError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::SignatureVerificationFailed => SignatureError::SignatureInvalid,
            CryptoError::InvalidPublicKey => SignatureError::InvalidKey,
            CryptoError::InvalidPrivateKey(msg) => SignatureError::InvalidPrivateKey(msg),
            CryptoError::InvalidKeyLength { expected, actual } => SignatureError::InvalidPrivateKey(
                format!("expected {expected} bytes, got {actual}"),
            ),
        }
    }
}
