use std::sync::Arc;

use parking_lot::Mutex;
use shared_types::{AttestedBlock, Block, BlockId, Query, QueryKind, QueryResult};
use wn_02_signature_service::{NodeIdentity, SignatureApi, SignatureService};
use wn_03_block_store::{BlockStore, InMemoryBlockStore, StoreConfig};

use crate::domain::errors::HandlerError;
use crate::ports::inbound::QueryHandler;
use crate::service::NodeService;

pub fn kind(tag: &str) -> QueryKind {
    QueryKind::parse(tag).unwrap()
}

pub fn signer(name: &str) -> Arc<SignatureService> {
    Arc::new(SignatureService::new(Arc::new(NodeIdentity::generate(name))))
}

pub fn service(name: &str) -> NodeService {
    let store: Arc<dyn BlockStore> = Arc::new(InMemoryBlockStore::new(StoreConfig::default()));
    NodeService::new(store, signer(name))
}

/// Records notifications into a shared log; answers with every stored block.
pub struct RecordingHandler {
    kind: QueryKind,
    log: Arc<Mutex<Vec<(String, BlockId)>>>,
    signer: Arc<SignatureService>,
}

impl RecordingHandler {
    pub fn new(
        tag: &str,
        log: Arc<Mutex<Vec<(String, BlockId)>>>,
        signer: Arc<SignatureService>,
    ) -> Self {
        Self {
            kind: kind(tag),
            log,
            signer,
        }
    }
}

impl QueryHandler for RecordingHandler {
    fn kind(&self) -> &QueryKind {
        &self.kind
    }

    fn on_block_stored(&self, id: &BlockId, _block: &Block) -> Result<(), HandlerError> {
        self.log.lock().push((self.kind.to_string(), *id));
        Ok(())
    }

    fn handle(&self, _query: &Query, store: &dyn BlockStore) -> Result<QueryResult, HandlerError> {
        Ok(QueryResult::from_entries(store.scan().map(|(id, block)| {
            AttestedBlock {
                block: (*block).clone(),
                attestation: self.signer.attest(&id),
            }
        })))
    }
}

/// Fails every notification and every query.
pub struct FailingHandler(pub QueryKind);

impl QueryHandler for FailingHandler {
    fn kind(&self) -> &QueryKind {
        &self.0
    }

    fn on_block_stored(&self, _id: &BlockId, _block: &Block) -> Result<(), HandlerError> {
        Err(HandlerError::Failed("refusing notification".into()))
    }

    fn handle(&self, _query: &Query, _store: &dyn BlockStore) -> Result<QueryResult, HandlerError> {
        Err(HandlerError::Failed("refusing query".into()))
    }
}

/// Panics on every notification and every query.
pub struct PanickingHandler(pub QueryKind);

impl QueryHandler for PanickingHandler {
    fn kind(&self) -> &QueryKind {
        &self.0
    }

    fn on_block_stored(&self, _id: &BlockId, _block: &Block) -> Result<(), HandlerError> {
        panic!("handler bug");
    }

    fn handle(&self, _query: &Query, _store: &dyn BlockStore) -> Result<QueryResult, HandlerError> {
        panic!("handler bug");
    }
}

/// Returns an attestation for a block that was never stored.
pub struct LyingHandler {
    pub kind: QueryKind,
    pub signer: Arc<SignatureService>,
}

impl QueryHandler for LyingHandler {
    fn kind(&self) -> &QueryKind {
        &self.kind
    }

    fn handle(&self, _query: &Query, _store: &dyn BlockStore) -> Result<QueryResult, HandlerError> {
        let block = Block::text("never stored");
        let attestation = self.signer.attest(&block.id());
        Ok(QueryResult::from_entries([AttestedBlock { block, attestation }]))
    }
}
