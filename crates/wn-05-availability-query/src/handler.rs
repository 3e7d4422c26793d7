//! # Availability Query Handler
//!
//! ## Algorithm
//!
//! - template with an `id`: one direct store lookup
//! - otherwise: a fresh scan of the store, filtered by the template
//!
//! Every match is attested at query time. Attestations are never cached,
//! so none can outlive the block it refers to.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use shared_types::{AttestedBlock, Block, BlockId, Query, QueryKind, QueryResult};
use tracing::debug;
use wn_02_signature_service::SignatureApi;
use wn_03_block_store::{BlockStore, BlockStoreError};
use wn_04_node_service::{HandlerError, QueryHandler};

use crate::domain::template::{AvailabilityQuery, BlockTemplate};

/// Kind tag served by [`AvailabilityQueryHandler`].
pub const AVAILABILITY_KIND: &str = "availability/v1";

/// [`AVAILABILITY_KIND`] as a [`QueryKind`].
pub fn availability_kind() -> QueryKind {
    QueryKind::from_static(AVAILABILITY_KIND)
}

/// Handler for `availability/v1` queries.
pub struct AvailabilityQueryHandler {
    kind: QueryKind,
    signer: Arc<dyn SignatureApi>,
    blocks_observed: AtomicU64,
    queries_answered: AtomicU64,
}

impl AvailabilityQueryHandler {
    pub fn new(signer: Arc<dyn SignatureApi>) -> Self {
        Self {
            kind: availability_kind(),
            signer,
            blocks_observed: AtomicU64::new(0),
            queries_answered: AtomicU64::new(0),
        }
    }

    /// Blocks this handler has been notified about.
    pub fn blocks_observed(&self) -> u64 {
        self.blocks_observed.load(Ordering::Relaxed)
    }

    /// Queries answered successfully.
    pub fn queries_answered(&self) -> u64 {
        self.queries_answered.load(Ordering::Relaxed)
    }

    fn find(&self, template: &BlockTemplate, store: &dyn BlockStore) -> Result<QueryResult, HandlerError> {
        let mut result = QueryResult::new();

        match template.id {
            Some(id) => match store.get(&id) {
                Ok(block) if template.matches(&id, &block) => {
                    result.push(self.attested(id, &block));
                }
                Ok(_) | Err(BlockStoreError::NotFound { .. }) => {}
                Err(err) => return Err(err.into()),
            },
            None => {
                for (id, block) in store.scan() {
                    if template.matches(&id, &block) {
                        result.push(self.attested(id, &block));
                    }
                }
            }
        }

        Ok(result)
    }

    fn attested(&self, id: BlockId, block: &Block) -> AttestedBlock {
        AttestedBlock {
            block: block.clone(),
            attestation: self.signer.attest(&id),
        }
    }
}

impl QueryHandler for AvailabilityQueryHandler {
    fn kind(&self) -> &QueryKind {
        &self.kind
    }

    fn on_block_stored(&self, _id: &BlockId, _block: &Block) -> Result<(), HandlerError> {
        self.blocks_observed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn handle(&self, query: &Query, store: &dyn BlockStore) -> Result<QueryResult, HandlerError> {
        let AvailabilityQuery { template } = AvailabilityQuery::decode(&query.payload)?;
        let result = self.find(&template, store)?;

        self.queries_answered.fetch_add(1, Ordering::Relaxed);
        debug!(
            attester = %self.signer.node_name(),
            direct = template.id.is_some(),
            matches = result.len(),
            "Availability query answered"
        );
        Ok(result)
    }
}

impl std::fmt::Debug for AvailabilityQueryHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityQueryHandler")
            .field("blocks_observed", &self.blocks_observed())
            .field("queries_answered", &self.queries_answered())
            .finish()
    }
}
