//! # Peer Identity Types
//!
//! Public keys, signatures, certificates and contacts. These are plain value
//! types; signing and verification live in `wn-02-signature-service`.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt;
use std::net::SocketAddr;

/// Domain separator for certificate self-signatures.
pub const CERTIFICATE_DOMAIN: &[u8] = b"witness-net/certificate/v1";

/// Domain separator for handshake proofs.
pub const HANDSHAKE_DOMAIN: &[u8] = b"witness-net/handshake/v1";

/// Bytes a node signs to prove its identity on a fresh connection:
/// `HANDSHAKE_DOMAIN || challenge || name`.
#[must_use]
pub fn handshake_signing_bytes(challenge: &[u8; 32], name: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(HANDSHAKE_DOMAIN.len() + 32 + name.len());
    out.extend_from_slice(HANDSHAKE_DOMAIN);
    out.extend_from_slice(challenge);
    out.extend_from_slice(name.as_bytes());
    out
}

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    /// Raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

/// A 64-byte Ed25519 signature.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(#[serde_as(as = "Bytes")] pub [u8; 64]);

impl Signature {
    /// Raw signature bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}..)", hex::encode(&self.0[..8]))
    }
}

/// Self-signed binding of a peer name to a public key.
///
/// The signature covers [`NodeCertificate::signing_bytes`]. Validation is
/// performed by the signature service, never by this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCertificate {
    /// The peer name this certificate is issued to.
    pub subject: String,
    /// The subject's public key.
    pub public_key: PublicKey,
    /// Self-signature over the subject and key.
    pub signature: Signature,
}

impl NodeCertificate {
    /// Bytes covered by the certificate signature.
    ///
    /// `CERTIFICATE_DOMAIN || len(subject) (4, LE) || subject || public_key`
    #[must_use]
    pub fn signing_bytes(subject: &str, public_key: &PublicKey) -> Vec<u8> {
        let mut out = Vec::with_capacity(CERTIFICATE_DOMAIN.len() + 4 + subject.len() + 32);
        out.extend_from_slice(CERTIFICATE_DOMAIN);
        out.extend_from_slice(&(subject.len() as u32).to_le_bytes());
        out.extend_from_slice(subject.as_bytes());
        out.extend_from_slice(public_key.as_bytes());
        out
    }

    /// Signing bytes for this certificate.
    #[must_use]
    pub fn to_signing_bytes(&self) -> Vec<u8> {
        Self::signing_bytes(&self.subject, &self.public_key)
    }
}

/// A peer's network address plus verifiable public identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Unique peer name (directory key).
    pub name: String,
    /// Where the peer's node service listens.
    pub address: SocketAddr,
    /// Certificate binding `name` to a public key.
    pub certificate: NodeCertificate,
}

impl Contact {
    /// Create a contact.
    pub fn new(name: impl Into<String>, address: SocketAddr, certificate: NodeCertificate) -> Self {
        Self {
            name: name.into(),
            address,
            certificate,
        }
    }

    /// The contact's trusted public key.
    #[must_use]
    pub fn public_key(&self) -> &PublicKey {
        &self.certificate.public_key
    }
}
