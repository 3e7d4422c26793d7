//! # Handler Plugins
//!
//! Additional query kinds registered next to the availability handler, and
//! the node's isolation of handlers that fail.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use shared_types::{AttestedBlock, Block, BlockId, ContentType, Query, QueryKind, QueryResult};
    use wn_02_signature_service::{NodeIdentity, SignatureApi, SignatureService};
    use wn_03_block_store::BlockStore;
    use wn_04_node_service::{HandlerError, QueryHandler};
    use wn_05_availability_query::{AvailabilityQuery, BlockTemplate};
    use wn_06_node_client::ClientError;

    use crate::fixtures::{client, TestNode};

    /// Text blocks containing the UTF-8 query payload.
    struct KeywordHandler {
        kind: QueryKind,
        signer: Arc<dyn SignatureApi>,
    }

    impl QueryHandler for KeywordHandler {
        fn kind(&self) -> &QueryKind {
            &self.kind
        }

        fn handle(&self, query: &Query, store: &dyn BlockStore) -> Result<QueryResult, HandlerError> {
            let keyword = std::str::from_utf8(&query.payload)
                .map_err(|e| HandlerError::MalformedQuery(e.to_string()))?;
            Ok(QueryResult::from_entries(
                store
                    .scan()
                    .filter(|(_, block)| block.content_type == ContentType::Text)
                    .filter(|(_, block)| block.payload_str().is_some_and(|t| t.contains(keyword)))
                    .map(|(id, block)| AttestedBlock {
                        block: (*block).clone(),
                        attestation: self.signer.attest(&id),
                    }),
            ))
        }
    }

    /// Panics on every notification and fails every query.
    struct BrokenHandler {
        kind: QueryKind,
        notified: AtomicUsize,
    }

    impl QueryHandler for BrokenHandler {
        fn kind(&self) -> &QueryKind {
            &self.kind
        }

        fn on_block_stored(&self, _id: &BlockId, _block: &Block) -> Result<(), HandlerError> {
            self.notified.fetch_add(1, Ordering::SeqCst);
            panic!("broken handler");
        }

        fn handle(&self, _query: &Query, _store: &dyn BlockStore) -> Result<QueryResult, HandlerError> {
            Err(HandlerError::Failed("always fails".into()))
        }
    }

    /// Attests under a key other than the node's own.
    struct ForeignKeyHandler {
        kind: QueryKind,
        foreign: SignatureService,
    }

    impl QueryHandler for ForeignKeyHandler {
        fn kind(&self) -> &QueryKind {
            &self.kind
        }

        fn handle(&self, _query: &Query, store: &dyn BlockStore) -> Result<QueryResult, HandlerError> {
            Ok(QueryResult::from_entries(store.scan().map(|(id, block)| {
                AttestedBlock {
                    block: (*block).clone(),
                    attestation: self.foreign.attest(&id),
                }
            })))
        }
    }

    async fn keyword_node() -> TestNode {
        let node = TestNode::start("wilbur").await;
        let keyword = Arc::new(KeywordHandler {
            kind: QueryKind::from_static("keyword/v1"),
            signer: node.signer.clone(),
        });
        node.service().register_query_handler(keyword).unwrap();
        node
    }

    #[tokio::test]
    async fn test_keyword_handler_answers_alongside_availability() {
        let wilbur = keyword_node().await;
        let orville = client("orville", &[&wilbur]);

        for text in ["first flight", "second flight", "bicycle shop"] {
            orville.send_block("wilbur", Block::text(text)).await.unwrap();
        }

        let flights = orville
            .query(
                "wilbur",
                Query::new(QueryKind::from_static("keyword/v1"), b"flight".to_vec()),
            )
            .await
            .unwrap();
        let shop = AvailabilityQuery::new(BlockTemplate::exact(&Block::text("bicycle shop")))
            .into_query();
        let availability = orville.query("wilbur", shop).await.unwrap();

        assert_eq!(flights.len(), 2);
        assert_eq!(availability.len(), 1);
        assert_eq!(wilbur.service().registered_kinds().len(), 2);
        wilbur.shutdown().await;
    }

    #[tokio::test]
    async fn test_handler_registered_late_still_sees_earlier_blocks() {
        let wilbur = TestNode::start("wilbur").await;
        let orville = client("orville", &[&wilbur]);
        orville
            .send_block("wilbur", Block::text("stored before registration"))
            .await
            .unwrap();

        wilbur
            .service()
            .register_query_handler(Arc::new(KeywordHandler {
                kind: QueryKind::from_static("keyword/v1"),
                signer: wilbur.signer.clone(),
            }))
            .unwrap();
        let result = orville
            .query(
                "wilbur",
                Query::new(QueryKind::from_static("keyword/v1"), b"before".to_vec()),
            )
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        wilbur.shutdown().await;
    }

    #[tokio::test]
    async fn test_broken_handler_does_not_stop_intake() {
        let broken = Arc::new(BrokenHandler {
            kind: QueryKind::from_static("broken/v1"),
            notified: AtomicUsize::new(0),
        });
        let plugin: Arc<dyn QueryHandler> = broken.clone();
        let wilbur = TestNode::start_with("wilbur", vec![plugin]).await;
        let orville = client("orville", &[&wilbur]);
        let block = Block::text("survives");

        orville.send_block("wilbur", block.clone()).await.unwrap();
        let found = orville
            .query(
                "wilbur",
                AvailabilityQuery::new(BlockTemplate::exact(&block)).into_query(),
            )
            .await
            .unwrap();
        let failed = orville
            .query("wilbur", Query::new(QueryKind::from_static("broken/v1"), Vec::new()))
            .await
            .unwrap_err();

        assert_eq!(found.len(), 1);
        assert_eq!(broken.notified.load(Ordering::SeqCst), 1);
        assert_eq!(wilbur.availability.blocks_observed(), 1);
        assert_eq!(wilbur.service().stats().notification_failures, 1);
        assert!(matches!(failed, ClientError::RemoteRejected { .. }));
        // The connection survives a handler failure and is reused.
        assert_eq!(orville.pooled_connections("wilbur"), 1);
        wilbur.shutdown().await;
    }

    #[tokio::test]
    async fn test_foreign_key_attestations_never_reach_the_caller() {
        let foreign = SignatureService::new(Arc::new(NodeIdentity::generate("mallory")));
        let plugin: Arc<dyn QueryHandler> = Arc::new(ForeignKeyHandler {
            kind: QueryKind::from_static("foreign/v1"),
            foreign,
        });
        let wilbur = TestNode::start_with("wilbur", vec![plugin]).await;
        let orville = client("orville", &[&wilbur]);
        orville.send_block("wilbur", Block::text("x")).await.unwrap();

        let result = orville
            .query("wilbur", Query::new(QueryKind::from_static("foreign/v1"), Vec::new()))
            .await
            .unwrap();

        assert!(result.is_empty());
        wilbur.shutdown().await;
    }
}
