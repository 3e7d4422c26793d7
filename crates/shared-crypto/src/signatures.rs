//! # Ed25519 Signatures
//!
//! Twisted Edwards curve signatures with deterministic nonces.
//!
//! ## Security Properties
//!
//! - No RNG dependency when signing (nonce derived from key and message)
//! - Strict verification (rejects non-canonical and small-order encodings)
//! - Secret seed zeroized on drop

use crate::CryptoError;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use shared_types::{PublicKey, Signature};
use zeroize::{Zeroize, Zeroizing};

/// Length of an Ed25519 secret seed.
pub const SEED_LEN: usize = 32;

/// Ed25519 keypair.
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret seed (32 bytes).
    pub fn from_seed(seed: [u8; SEED_LEN]) -> Self {
        let mut seed = seed;
        let signing_key = SigningKey::from_bytes(&seed);
        seed.zeroize();
        Self { signing_key }
    }

    /// Decode a hex-encoded seed, as stored in key files.
    ///
    /// Surrounding whitespace is ignored.
    pub fn from_hex_seed(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = Zeroizing::new(
            hex::decode(encoded.trim()).map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?,
        );
        if bytes.len() != SEED_LEN {
            return Err(CryptoError::InvalidKeyLength {
                expected: SEED_LEN,
                actual: bytes.len(),
            });
        }
        let mut seed = [0u8; SEED_LEN];
        seed.copy_from_slice(&bytes);
        Ok(Self::from_seed(seed))
    }

    /// Hex-encoded seed for writing key files.
    pub fn to_hex_seed(&self) -> Zeroizing<String> {
        let seed = Zeroizing::new(self.signing_key.to_bytes());
        Zeroizing::new(hex::encode(seed.as_slice()))
    }

    /// Get public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message (deterministic - no RNG needed).
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes())
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

impl Drop for Ed25519KeyPair {
    fn drop(&mut self) {
        // Zeroize secret key material
        let mut bytes = self.signing_key.to_bytes();
        bytes.zeroize();
    }
}

/// Check that bytes encode a usable Ed25519 public key.
pub fn validate_public_key(key: &PublicKey) -> Result<(), CryptoError> {
    VerifyingKey::from_bytes(key.as_bytes())
        .map(|_| ())
        .map_err(|_| CryptoError::InvalidPublicKey)
}

/// Verify `signature` over `message` under `key`.
pub fn verify_signature(
    key: &PublicKey,
    message: &[u8],
    signature: &Signature,
) -> Result<(), CryptoError> {
    let verifying_key =
        VerifyingKey::from_bytes(key.as_bytes()).map_err(|_| CryptoError::InvalidPublicKey)?;
    let sig = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
    verifying_key
        .verify_strict(message, &sig)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}
