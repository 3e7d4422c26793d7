//! # Inbound Ports (Driving Ports / API)
//!
//! The storage API used by the node service and by query handlers.

use std::sync::Arc;

use shared_types::{Block, BlockId};

use crate::domain::errors::BlockStoreError;

/// Whether a put added a new block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The block was not present and has been stored.
    Inserted,
    /// An identical block was already stored; nothing changed.
    AlreadyPresent,
}

/// Primary Block Store API.
///
/// Implementations must be thread-safe and must never perform network I/O.
/// Query handlers receive a `&dyn BlockStore` view.
pub trait BlockStore: Send + Sync {
    /// Validate and store `block`, reporting whether it was new.
    fn put_with_outcome(&self, block: Block) -> Result<(BlockId, PutOutcome), BlockStoreError>;

    /// Validate and store `block`.
    ///
    /// Idempotent: storing a present block returns the same id.
    fn put(&self, block: Block) -> Result<BlockId, BlockStoreError> {
        self.put_with_outcome(block).map(|(id, _)| id)
    }

    /// Fetch a block by id.
    fn get(&self, id: &BlockId) -> Result<Arc<Block>, BlockStoreError>;

    /// Whether a block with `id` is stored.
    fn contains(&self, id: &BlockId) -> bool;

    /// Snapshot of every stored block at the time of the call.
    fn scan(&self) -> BlockScan;

    /// Number of stored blocks.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A finite, restartable iteration over a store snapshot.
///
/// Blocks inserted after the scan was taken are not visited. Entries are
/// yielded in ascending id order.
#[derive(Debug, Clone)]
pub struct BlockScan {
    entries: Arc<[(BlockId, Arc<Block>)]>,
    position: usize,
}

impl BlockScan {
    /// Build a scan from a snapshot of entries.
    pub fn new(mut entries: Vec<(BlockId, Arc<Block>)>) -> Self {
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        Self {
            entries: entries.into(),
            position: 0,
        }
    }

    /// Start over from the first entry of the same snapshot.
    pub fn restart(&mut self) {
        self.position = 0;
    }

    /// Number of entries in the snapshot.
    pub fn snapshot_len(&self) -> usize {
        self.entries.len()
    }
}

impl Iterator for BlockScan {
    type Item = (BlockId, Arc<Block>);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.get(self.position)?.clone();
        self.position += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BlockScan {}
