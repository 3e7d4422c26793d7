//! # In-Memory Block Store
//!
//! One `RwLock<HashMap<BlockId, Arc<Block>>>`. Ids are derived and blocks
//! validated before the lock is taken; the write lock covers only the map
//! insert, so concurrent puts serialize on that single operation.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{Block, BlockId};
use tracing::trace;

use crate::domain::config::StoreConfig;
use crate::domain::errors::BlockStoreError;
use crate::domain::validation::validate_block;
use crate::ports::inbound::{BlockScan, BlockStore, PutOutcome};

/// Process-local block store. Contents do not survive a restart.
#[derive(Debug, Default)]
pub struct InMemoryBlockStore {
    config: StoreConfig,
    blocks: RwLock<HashMap<BlockId, Arc<Block>>>,
}

impl InMemoryBlockStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            blocks: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

impl BlockStore for InMemoryBlockStore {
    fn put_with_outcome(&self, block: Block) -> Result<(BlockId, PutOutcome), BlockStoreError> {
        validate_block(&block, &self.config)?;
        let id = block.id();

        let outcome = {
            let mut blocks = self.blocks.write();
            if blocks.contains_key(&id) {
                PutOutcome::AlreadyPresent
            } else {
                blocks.insert(id, Arc::new(block));
                PutOutcome::Inserted
            }
        };

        trace!(block_id = %id, ?outcome, "Block put");
        Ok((id, outcome))
    }

    fn get(&self, id: &BlockId) -> Result<Arc<Block>, BlockStoreError> {
        self.blocks
            .read()
            .get(id)
            .cloned()
            .ok_or(BlockStoreError::NotFound { id: *id })
    }

    fn contains(&self, id: &BlockId) -> bool {
        self.blocks.read().contains_key(id)
    }

    fn scan(&self) -> BlockScan {
        let snapshot: Vec<_> = self
            .blocks
            .read()
            .iter()
            .map(|(id, block)| (*id, Arc::clone(block)))
            .collect();
        BlockScan::new(snapshot)
    }

    fn len(&self) -> usize {
        self.blocks.read().len()
    }
}
