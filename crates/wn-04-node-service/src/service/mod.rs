//! # Node Service
//!
//! Application service behind every peer connection.
//!
//! ## Intake Ordering
//!
//! ```text
//! on_block_received(B)
//!     │
//!     ├─ validate + insert into BlockStore
//!     ├─ notify handler 1, handler 2, ... (registration order, failures isolated)
//!     └─ return id  ──→ caller sends Ack
//! ```
//!
//! A handler therefore sees every block before the block's sender is
//! acknowledged, and a query issued after an ack can match that block.

mod registry;


pub use registry::HandlerRegistry;

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use shared_types::{Block, BlockId, Query, QueryKind, QueryResult};
use shared_wire::{Response, MAX_FRAME_SIZE};
use tracing::{debug, warn};
use wn_02_signature_service::SignatureService;
use wn_03_block_store::{BlockStore, PutOutcome};

use crate::domain::config::NodeConfig;
use crate::domain::errors::NodeError;
use crate::domain::stats::{NodeStats, ServiceMetrics};
use crate::ports::inbound::QueryHandler;

/// Block intake and query dispatch for one node.
pub struct NodeService {
    store: Arc<dyn BlockStore>,
    signer: Arc<SignatureService>,
    registry: HandlerRegistry,
    pub(crate) metrics: ServiceMetrics,
    config: NodeConfig,
}

impl NodeService {
    pub fn new(store: Arc<dyn BlockStore>, signer: Arc<SignatureService>) -> Self {
        Self::with_config(store, signer, NodeConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn BlockStore>,
        signer: Arc<SignatureService>,
        config: NodeConfig,
    ) -> Self {
        Self {
            store,
            signer,
            registry: HandlerRegistry::new(),
            metrics: ServiceMetrics::default(),
            config,
        }
    }

    pub fn store(&self) -> &Arc<dyn BlockStore> {
        &self.store
    }

    pub fn signer(&self) -> &Arc<SignatureService> {
        &self.signer
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Store `block` and notify every handler, in registration order.
    ///
    /// Returns once all notifications have completed. A block that was
    /// already stored is acknowledged again without re-notifying handlers.
    pub fn on_block_received(&self, block: Block) -> Result<BlockId, NodeError> {
        ServiceMetrics::bump(&self.metrics.blocks_received);

        let (id, outcome) = match self.store.put_with_outcome(block) {
            Ok(stored) => stored,
            Err(err) => {
                ServiceMetrics::bump(&self.metrics.blocks_rejected);
                debug!(error = %err, "Block rejected");
                return Err(err.into());
            }
        };

        match outcome {
            PutOutcome::AlreadyPresent => {
                ServiceMetrics::bump(&self.metrics.duplicate_blocks);
                debug!(block_id = %id, "Duplicate block acknowledged");
            }
            PutOutcome::Inserted => {
                ServiceMetrics::bump(&self.metrics.blocks_stored);
                debug!(block_id = %id, "Block stored");
                match self.store.get(&id) {
                    Ok(stored) => self.notify_handlers(&id, &stored),
                    Err(err) => warn!(block_id = %id, error = %err, "Stored block vanished before notification"),
                }
            }
        }

        Ok(id)
    }

    fn notify_handlers(&self, id: &BlockId, block: &Block) {
        for handler in self.registry.snapshot() {
            let outcome = catch_unwind(AssertUnwindSafe(|| handler.on_block_stored(id, block)));
            let failure = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => err.to_string(),
                Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
            };
            ServiceMetrics::bump(&self.metrics.notification_failures);
            warn!(
                handler = %handler.kind(),
                block_id = %id,
                error = %failure,
                "Query handler failed on block notification"
            );
        }
    }

    /// Add a handler to the fan-out list and the kind registry.
    pub fn register_query_handler(&self, handler: Arc<dyn QueryHandler>) -> Result<(), NodeError> {
        let kind = handler.kind().clone();
        self.registry.register(handler)?;
        debug!(kind = %kind, "Query handler registered");
        Ok(())
    }

    /// Dispatch `query` to the handler registered for its kind.
    pub fn on_query(&self, query: &Query) -> Result<QueryResult, NodeError> {
        let result = self.dispatch_query(query);
        match &result {
            Ok(answer) => {
                ServiceMetrics::bump(&self.metrics.queries_served);
                debug!(kind = %query.kind, matches = answer.len(), "Query answered");
            }
            Err(err) => {
                ServiceMetrics::bump(&self.metrics.queries_rejected);
                debug!(kind = %query.kind, error = %err, "Query rejected");
            }
        }
        result
    }

    fn dispatch_query(&self, query: &Query) -> Result<QueryResult, NodeError> {
        let handler = self
            .registry
            .get(&query.kind)
            .ok_or_else(|| NodeError::UnsupportedQuery {
                kind: query.kind.clone(),
            })?;

        let store = self.store.as_ref();
        let answer = match catch_unwind(AssertUnwindSafe(|| handler.handle(query, store))) {
            Ok(Ok(answer)) => answer,
            Ok(Err(err)) => {
                return Err(NodeError::HandlerFailure {
                    kind: query.kind.clone(),
                    reason: err.to_string(),
                })
            }
            Err(payload) => {
                return Err(NodeError::HandlerFailure {
                    kind: query.kind.clone(),
                    reason: format!("panicked: {}", panic_message(payload.as_ref())),
                })
            }
        };

        let answer = self.retain_attestable(&query.kind, answer);
        self.ensure_fits_frame(&query.kind, &answer)?;
        Ok(answer)
    }

    /// Refuse an answer the connection could not send as one frame.
    fn ensure_fits_frame(&self, kind: &QueryKind, answer: &QueryResult) -> Result<(), NodeError> {
        let max = self.config.max_frame_size.min(MAX_FRAME_SIZE);
        let size = Response::query_result_len(answer).map_err(|err| NodeError::HandlerFailure {
            kind: kind.clone(),
            reason: err.to_string(),
        })?;
        if size > max {
            return Err(NodeError::ResultTooLarge {
                kind: kind.clone(),
                size,
                max,
            });
        }
        Ok(())
    }

    /// Drop entries a handler must not have produced: an attestation for a
    /// different block, or for a block absent from the store.
    fn retain_attestable(&self, kind: &QueryKind, answer: QueryResult) -> QueryResult {
        QueryResult::from_entries(answer.into_iter().filter(|entry| {
            let id = entry.block.id();
            let ok = entry.attestation.block_id == id && self.store.contains(&id);
            if !ok {
                warn!(handler = %kind, block_id = %id, "Dropping unattestable query result entry");
            }
            ok
        }))
    }

    /// Counters since start.
    pub fn stats(&self) -> NodeStats {
        self.metrics.snapshot()
    }

    /// Kinds with a registered handler, in registration order.
    pub fn registered_kinds(&self) -> Vec<QueryKind> {
        self.registry.kinds()
    }
}

impl std::fmt::Debug for NodeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeService")
            .field("registry", &self.registry)
            .field("blocks", &self.store.len())
            .finish_non_exhaustive()
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
