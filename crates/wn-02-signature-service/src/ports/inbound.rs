//! # Inbound Ports (Driving Ports / API)
//!
//! The signing API other components depend on. Implementations must be
//! thread-safe (`Send + Sync`).

use shared_types::{Attestation, BlockId, Contact, PublicKey, Signature};

use crate::domain::errors::SignatureError;

/// Signing and verification bound to one node identity.
pub trait SignatureApi: Send + Sync {
    // =========================================================================
    // Local identity
    // =========================================================================

    /// Name of the node this service signs for.
    fn node_name(&self) -> &str;

    /// Public key of the node this service signs for.
    fn public_key(&self) -> PublicKey;

    /// Sign arbitrary bytes with the node's private key.
    ///
    /// Deterministic: the same bytes always yield the same signature.
    fn sign(&self, message: &[u8]) -> Signature;

    /// Attest that this node holds `block_id`.
    ///
    /// Callers must only attest ids present in their store at the time of
    /// the call.
    fn attest(&self, block_id: &BlockId) -> Attestation;

    /// Answer a handshake challenge.
    fn prove_identity(&self, challenge: &[u8; 32]) -> Signature;

    // =========================================================================
    // Verification (no secret material involved)
    // =========================================================================

    /// `true` iff `signature` is valid for `message` under `public_key`.
    ///
    /// Malformed keys and signatures yield `false`, never a panic.
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool;

    /// Check an attestation against the key the caller trusts for its issuer.
    fn verify_attestation(
        &self,
        attestation: &Attestation,
        trusted_key: &PublicKey,
    ) -> Result<(), SignatureError>;

    /// Check that a contact's certificate names it and is correctly self-signed.
    fn validate_certificate(&self, contact: &Contact) -> Result<(), SignatureError>;

    /// Check a handshake proof produced by `contact` over `challenge`.
    fn verify_identity(&self, contact: &Contact, challenge: &[u8; 32], proof: &Signature) -> bool;
}
