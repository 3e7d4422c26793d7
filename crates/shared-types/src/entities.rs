//! # Core Domain Entities
//!
//! Defines the content-addressed block, the unit every node stores and
//! attests to.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// Discriminated content type of a block payload.
///
/// The discriminant is part of the canonical encoding, so two blocks with
/// equal payloads but different content types are different blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ContentType {
    /// Opaque bytes.
    Raw = 0,
    /// UTF-8 text.
    Text = 1,
    /// A JSON document.
    Json = 2,
}

impl ContentType {
    /// Canonical tag byte.
    #[must_use]
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Content-derived block identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub Hash);

impl BlockId {
    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    /// Full lowercase hex rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for BlockId {
    /// Short form (first 8 bytes), used in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.to_hex())
    }
}

/// An immutable, content-addressed data unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    /// How the payload should be interpreted.
    pub content_type: ContentType,
    /// Opaque payload bytes.
    pub payload: Vec<u8>,
}

impl Block {
    /// Create a block from a content type and payload.
    pub fn new(content_type: ContentType, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type,
            payload: payload.into(),
        }
    }

    /// Create a `Text` block.
    pub fn text(contents: impl Into<String>) -> Self {
        Self::new(ContentType::Text, contents.into().into_bytes())
    }

    /// Create a `Raw` block.
    pub fn raw(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(ContentType::Raw, bytes)
    }

    /// Canonical encoding: `tag (1) || payload_len (8, LE) || payload`.
    ///
    /// This encoding is the sole input to the block identifier.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + 8 + self.payload.len());
        out.push(self.content_type.tag());
        out.extend_from_slice(&(self.payload.len() as u64).to_le_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Derive the block identifier.
    #[must_use]
    pub fn id(&self) -> BlockId {
        BlockId(Sha256::digest(self.canonical_bytes()).into())
    }

    /// Payload as UTF-8, if it is valid UTF-8.
    #[must_use]
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    /// Payload size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.payload.len()
    }
}
