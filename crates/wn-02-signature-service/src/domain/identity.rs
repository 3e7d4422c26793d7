//! # Node Identity
//!
//! A node's name, its Ed25519 key pair and the self-signed certificate
//! binding the two. Loaded once at startup and never changed.

use std::net::SocketAddr;

use shared_crypto::Ed25519KeyPair;
use shared_types::{Contact, NodeCertificate, PublicKey};

use super::errors::SignatureError;

/// The local node's identity.
#[derive(Debug)]
pub struct NodeIdentity {
    name: String,
    keypair: Ed25519KeyPair,
    certificate: NodeCertificate,
}

impl NodeIdentity {
    /// Bind `name` to an existing key pair and self-sign the certificate.
    pub fn new(name: impl Into<String>, keypair: Ed25519KeyPair) -> Self {
        let name = name.into();
        let public_key = keypair.public_key();
        let signature = keypair.sign(&NodeCertificate::signing_bytes(&name, &public_key));
        let certificate = NodeCertificate {
            subject: name.clone(),
            public_key,
            signature,
        };
        Self {
            name,
            keypair,
            certificate,
        }
    }

    /// Fresh random identity.
    pub fn generate(name: impl Into<String>) -> Self {
        Self::new(name, Ed25519KeyPair::generate())
    }

    /// Identity from a hex-encoded seed, as read from a key file.
    pub fn from_hex_seed(name: impl Into<String>, seed: &str) -> Result<Self, SignatureError> {
        let keypair = Ed25519KeyPair::from_hex_seed(seed)?;
        Ok(Self::new(name, keypair))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn public_key(&self) -> PublicKey {
        self.certificate.public_key
    }

    pub fn certificate(&self) -> &NodeCertificate {
        &self.certificate
    }

    /// This node as a contact reachable at `address`.
    pub fn contact(&self, address: SocketAddr) -> Contact {
        Contact::new(self.name.clone(), address, self.certificate.clone())
    }

    pub(crate) fn keypair(&self) -> &Ed25519KeyPair {
        &self.keypair
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::verify_signature;

    #[test]
    fn test_certificate_is_self_signed() {
        let identity = NodeIdentity::generate("wilbur");
        let cert = identity.certificate();

        assert_eq!(cert.subject, "wilbur");
        assert_eq!(cert.public_key, identity.public_key());
        assert!(verify_signature(&cert.public_key, &cert.to_signing_bytes(), &cert.signature).is_ok());
    }

    #[test]
    fn test_same_seed_same_identity() {
        let seed = "11".repeat(32);
        let a = NodeIdentity::from_hex_seed("wilbur", &seed).unwrap();
        let b = NodeIdentity::from_hex_seed("wilbur", &seed).unwrap();
        assert_eq!(a.certificate(), b.certificate());
    }

    #[test]
    fn test_bad_seed_is_rejected() {
        assert!(matches!(
            NodeIdentity::from_hex_seed("wilbur", "not hex"),
            Err(SignatureError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_contact_carries_certificate() {
        let identity = NodeIdentity::generate("orville");
        let contact = identity.contact("127.0.0.1:7101".parse().unwrap());
        assert_eq!(contact.name, "orville");
        assert_eq!(contact.public_key(), &identity.public_key());
    }
}
