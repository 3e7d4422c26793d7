//! # Inbound Ports
//!
//! The plug-in point for query protocols.

use shared_types::{Block, BlockId, Query, QueryKind, QueryResult};
use wn_03_block_store::BlockStore;

use crate::domain::errors::HandlerError;

/// A pluggable query protocol.
///
/// One handler is registered per [`QueryKind`]. Handlers are shared across
/// connection tasks, so any internal state must be synchronized.
pub trait QueryHandler: Send + Sync {
    /// The kind this handler answers.
    fn kind(&self) -> &QueryKind;

    /// Called once for every block newly added to the store, after the
    /// insert and before the sender is acknowledged.
    ///
    /// Errors and panics are logged and counted by the service; they never
    /// reach the block's sender or other handlers.
    fn on_block_stored(&self, _id: &BlockId, _block: &Block) -> Result<(), HandlerError> {
        Ok(())
    }

    /// Answer `query` against the node's store.
    ///
    /// Every returned entry must reference a block present in `store`.
    fn handle(&self, query: &Query, store: &dyn BlockStore) -> Result<QueryResult, HandlerError>;
}
