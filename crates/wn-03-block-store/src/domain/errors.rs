//! # Domain Errors
//!
//! Error types for the Block Store.

use shared_types::BlockId;
use std::fmt;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockStoreError {
    /// The block is structurally invalid (empty payload, bad encoding for
    /// its content type).
    MalformedBlock { reason: String },

    /// Payload exceeds `StoreConfig::max_block_size`.
    BlockTooLarge { size: usize, max_size: usize },

    /// No block with this id.
    NotFound { id: BlockId },
}

impl BlockStoreError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        BlockStoreError::MalformedBlock {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for BlockStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockStoreError::MalformedBlock { reason } => write!(f, "Malformed block: {reason}"),
            BlockStoreError::BlockTooLarge { size, max_size } => {
                write!(f, "Block too large: {size} bytes (max: {max_size})")
            }
            BlockStoreError::NotFound { id } => write!(f, "Block not found: {}", id.to_hex()),
        }
    }
}

impl std::error::Error for BlockStoreError {}
