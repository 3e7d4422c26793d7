//! # Queries and Attestations
//!
//! A `Query` is a tagged, opaque request. Only the handler registered for
//! its `QueryKind` interprets the payload. Answers are `QueryResult`s of
//! attested blocks.

use crate::entities::{Block, BlockId};
use crate::errors::TypeError;
use crate::identity::{PublicKey, Signature};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Domain separator for attestation signatures.
pub const ATTESTATION_DOMAIN: &[u8] = b"witness-net/attestation/v1";

/// Maximum length of a query kind tag.
pub const MAX_QUERY_KIND_LEN: usize = 64;

/// Tag identifying which query protocol a payload belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryKind(String);

impl QueryKind {
    /// Parse a kind tag.
    ///
    /// Tags are non-empty printable ASCII without whitespace, at most
    /// [`MAX_QUERY_KIND_LEN`] bytes.
    pub fn parse(tag: impl Into<String>) -> Result<Self, TypeError> {
        let tag = tag.into();
        if tag.is_empty() || tag.len() > MAX_QUERY_KIND_LEN {
            return Err(TypeError::InvalidQueryKind { tag });
        }
        if !tag.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(TypeError::InvalidQueryKind { tag });
        }
        Ok(Self(tag))
    }

    /// Build a kind from a compile-time constant tag.
    ///
    /// # Panics
    ///
    /// Panics if `tag` is not a valid kind. Use [`QueryKind::parse`] for
    /// tags that come from outside the program.
    #[must_use]
    pub fn from_static(tag: &'static str) -> Self {
        match Self::parse(tag) {
            Ok(kind) => kind,
            Err(_) => panic!("invalid static query kind: {tag:?}"),
        }
    }

    /// The tag string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A structured request for blocks, addressed to one query protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Which handler should answer.
    pub kind: QueryKind,
    /// Handler-specific encoded request.
    pub payload: Vec<u8>,
}

impl Query {
    /// Create a query.
    pub fn new(kind: QueryKind, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }
}

/// A signed statement that a node observed a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// The attested block.
    pub block_id: BlockId,
    /// Key of the attesting node.
    pub attester: PublicKey,
    /// Signature over [`Attestation::signing_bytes`].
    pub signature: Signature,
}

impl Attestation {
    /// Bytes covered by an attestation signature: `ATTESTATION_DOMAIN || block_id`.
    #[must_use]
    pub fn signing_bytes(block_id: &BlockId) -> Vec<u8> {
        let mut out = Vec::with_capacity(ATTESTATION_DOMAIN.len() + 32);
        out.extend_from_slice(ATTESTATION_DOMAIN);
        out.extend_from_slice(block_id.as_bytes());
        out
    }
}

/// A block paired with the attestation issued for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestedBlock {
    pub block: Block,
    pub attestation: Attestation,
}

/// Answer to a query: attested blocks with set semantics on block id.
///
/// Encodes as the entry list alone; the id index is rebuilt on decode, and
/// duplicates in the decoded list are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EntryList")]
pub struct QueryResult {
    entries: Vec<AttestedBlock>,
    #[serde(skip)]
    ids: HashSet<BlockId>,
}

#[derive(Deserialize)]
struct EntryList {
    entries: Vec<AttestedBlock>,
}

impl From<EntryList> for QueryResult {
    fn from(list: EntryList) -> Self {
        Self::from_entries(list.entries)
    }
}

impl QueryResult {
    /// An empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a result, dropping entries whose block id was already seen.
    pub fn from_entries(entries: impl IntoIterator<Item = AttestedBlock>) -> Self {
        let mut result = Self::new();
        for entry in entries {
            result.push(entry);
        }
        result
    }

    /// Append an entry. Returns `false` (and drops it) if the block id is
    /// already present.
    pub fn push(&mut self, entry: AttestedBlock) -> bool {
        if !self.ids.insert(entry.attestation.block_id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Whether a block id is present.
    #[must_use]
    pub fn contains(&self, id: &BlockId) -> bool {
        self.ids.contains(id)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries.
    pub fn iter(&self) -> std::slice::Iter<'_, AttestedBlock> {
        self.entries.iter()
    }

    /// Consume into the entry list.
    #[must_use]
    pub fn into_entries(self) -> Vec<AttestedBlock> {
        self.entries
    }

    /// Block ids in this result.
    #[must_use]
    pub fn block_ids(&self) -> HashSet<BlockId> {
        self.ids.clone()
    }
}

impl IntoIterator for QueryResult {
    type Item = AttestedBlock;
    type IntoIter = std::vec::IntoIter<AttestedBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a AttestedBlock;
    type IntoIter = std::slice::Iter<'a, AttestedBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
