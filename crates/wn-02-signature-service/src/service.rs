//! # Signature Service
//!
//! Implements [`SignatureApi`] for one [`NodeIdentity`], delegating the
//! curve arithmetic to `shared-crypto`.

use std::sync::Arc;

use shared_crypto::{validate_public_key, verify_signature};
use shared_types::{
    handshake_signing_bytes, Attestation, BlockId, Contact, NodeCertificate, PublicKey, Signature,
};
use tracing::debug;

use crate::domain::errors::SignatureError;
use crate::domain::identity::NodeIdentity;
use crate::ports::inbound::SignatureApi;

/// Signature service bound to the local node's identity.
#[derive(Debug, Clone)]
pub struct SignatureService {
    identity: Arc<NodeIdentity>,
}

impl SignatureService {
    pub fn new(identity: Arc<NodeIdentity>) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }
}

impl SignatureApi for SignatureService {
    fn node_name(&self) -> &str {
        self.identity.name()
    }

    fn public_key(&self) -> PublicKey {
        self.identity.public_key()
    }

    fn sign(&self, message: &[u8]) -> Signature {
        self.identity.keypair().sign(message)
    }

    fn attest(&self, block_id: &BlockId) -> Attestation {
        Attestation {
            block_id: *block_id,
            attester: self.public_key(),
            signature: self.sign(&Attestation::signing_bytes(block_id)),
        }
    }

    fn prove_identity(&self, challenge: &[u8; 32]) -> Signature {
        self.sign(&handshake_signing_bytes(challenge, self.node_name()))
    }

    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
        verify_signature(public_key, message, signature).is_ok()
    }

    fn verify_attestation(
        &self,
        attestation: &Attestation,
        trusted_key: &PublicKey,
    ) -> Result<(), SignatureError> {
        if attestation.attester != *trusted_key {
            return Err(SignatureError::UntrustedAttester);
        }
        verify_signature(
            trusted_key,
            &Attestation::signing_bytes(&attestation.block_id),
            &attestation.signature,
        )?;
        Ok(())
    }

    fn validate_certificate(&self, contact: &Contact) -> Result<(), SignatureError> {
        let cert = &contact.certificate;
        let reject = |reason: &str| SignatureError::CertificateInvalid {
            subject: cert.subject.clone(),
            reason: reason.to_string(),
        };

        if cert.subject != contact.name {
            return Err(reject("subject does not match contact name"));
        }
        if validate_public_key(&cert.public_key).is_err() {
            return Err(reject("public key is not a valid Ed25519 point"));
        }
        let signed = NodeCertificate::signing_bytes(&cert.subject, &cert.public_key);
        if verify_signature(&cert.public_key, &signed, &cert.signature).is_err() {
            return Err(reject("self-signature does not verify"));
        }

        debug!(peer = %contact.name, key = %cert.public_key, "Certificate validated");
        Ok(())
    }

    fn verify_identity(&self, contact: &Contact, challenge: &[u8; 32], proof: &Signature) -> bool {
        self.verify(
            contact.public_key(),
            &handshake_signing_bytes(challenge, &contact.name),
            proof,
        )
    }
}
