//! # Attestation Flow
//!
//! ```text
//! client ──SendBlock──→ node: store → notify handlers → Ack
//! client ──Query──────→ node: handler → attest matches → QueryResult
//! client: verify every attestation against the node's contact key
//! ```

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::future::join_all;
    use shared_types::{Block, ContentType, Query, QueryKind};
    use wn_02_signature_service::SignatureApi;
    use wn_05_availability_query::{AvailabilityQuery, BlockTemplate};
    use wn_06_node_client::{ClientError, RejectCode};

    use crate::fixtures::{client, TestNode};

    fn exact(block: &Block) -> Query {
        AvailabilityQuery::new(BlockTemplate::exact(block)).into_query()
    }

    #[tokio::test]
    async fn test_wilbur_attests_block_contents() {
        let wilbur = TestNode::start("wilbur").await;
        let orville = client("orville", &[&wilbur]);
        let block = Block::text("block contents");

        orville.send_block("wilbur", block.clone()).await.unwrap();
        let result = orville.query("wilbur", exact(&block)).await.unwrap();

        assert_eq!(result.len(), 1);
        let entry = result.iter().next().unwrap();
        assert_eq!(entry.block.payload_str(), Some("block contents"));
        assert!(wilbur
            .signer
            .verify_attestation(&entry.attestation, &wilbur.identity.public_key())
            .is_ok());
        assert_eq!(wilbur.availability.blocks_observed(), 1);

        orville.shutdown().await;
        wilbur.shutdown().await;
    }

    #[tokio::test]
    async fn test_never_stored_content_is_empty() {
        let wilbur = TestNode::start("wilbur").await;
        let orville = client("orville", &[&wilbur]);

        let result = orville
            .query("wilbur", exact(&Block::text("never stored")))
            .await
            .unwrap();

        assert!(result.is_empty());
        wilbur.shutdown().await;
    }

    #[tokio::test]
    async fn test_unregistered_kind_is_unsupported() {
        let wilbur = TestNode::start("wilbur").await;
        let orville = client("orville", &[&wilbur]);

        let err = orville
            .query(
                "wilbur",
                Query::new(QueryKind::from_static("keyword/v1"), b"flight".to_vec()),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ClientError::RemoteRejected {
                code: RejectCode::UnsupportedQuery,
                ..
            }
        ));
        assert_eq!(wilbur.service().stats().queries_rejected, 1);
        wilbur.shutdown().await;
    }

    #[tokio::test]
    async fn test_attestations_come_from_the_queried_node() {
        let wilbur = TestNode::start("wilbur").await;
        let katharine = TestNode::start("katharine").await;
        let orville = client("orville", &[&wilbur, &katharine]);
        let block = Block::text("shared");

        orville.send_block("wilbur", block.clone()).await.unwrap();
        orville.send_block("katharine", block.clone()).await.unwrap();

        let from_wilbur = orville.query("wilbur", exact(&block)).await.unwrap();
        let from_katharine = orville.query("katharine", exact(&block)).await.unwrap();

        let attester = |result: &shared_types::QueryResult| {
            result.iter().next().unwrap().attestation.attester
        };
        assert_eq!(attester(&from_wilbur), wilbur.identity.public_key());
        assert_eq!(attester(&from_katharine), katharine.identity.public_key());

        wilbur.shutdown().await;
        katharine.shutdown().await;
    }

    #[tokio::test]
    async fn test_blocks_stay_on_the_node_they_were_sent_to() {
        let wilbur = TestNode::start("wilbur").await;
        let katharine = TestNode::start("katharine").await;
        let orville = client("orville", &[&wilbur, &katharine]);
        let block = Block::text("only at wilbur");

        orville.send_block("wilbur", block.clone()).await.unwrap();

        assert_eq!(orville.query("wilbur", exact(&block)).await.unwrap().len(), 1);
        assert!(orville
            .query("katharine", exact(&block))
            .await
            .unwrap()
            .is_empty());

        wilbur.shutdown().await;
        katharine.shutdown().await;
    }

    #[tokio::test]
    async fn test_concurrent_senders_store_every_block_once() {
        let wilbur = TestNode::start("wilbur").await;
        let clients: Vec<_> = (0..4)
            .map(|i| Arc::new(client(&format!("sender-{i}"), &[&wilbur])))
            .collect();

        let sends = clients.iter().enumerate().flat_map(|(i, c)| {
            (0..25).map(move |n| {
                let c = Arc::clone(c);
                // Every sender also repeats the first block to exercise dedup.
                let text = if n == 0 { "common".to_string() } else { format!("{i}-{n}") };
                async move { c.send_block("wilbur", Block::text(text)).await }
            })
        });
        for outcome in join_all(sends).await {
            outcome.unwrap();
        }

        let everything = AvailabilityQuery::new(BlockTemplate::any()).into_query();
        let result = clients[0].query("wilbur", everything).await.unwrap();

        assert_eq!(result.len(), 4 * 24 + 1);
        let stats = wilbur.service().stats();
        assert_eq!(stats.blocks_received, 100);
        assert_eq!(stats.blocks_stored, 97);
        assert_eq!(stats.duplicate_blocks, 3);
        wilbur.shutdown().await;
    }

    #[tokio::test]
    async fn test_content_type_template_over_the_wire() {
        let wilbur = TestNode::start("wilbur").await;
        let orville = client("orville", &[&wilbur]);

        orville.send_block("wilbur", Block::text("text")).await.unwrap();
        orville
            .send_block("wilbur", Block::new(ContentType::Json, br#"{"k":1}"#.to_vec()))
            .await
            .unwrap();
        orville
            .send_block("wilbur", Block::raw(vec![0, 1, 2]))
            .await
            .unwrap();

        let json_only =
            AvailabilityQuery::new(BlockTemplate::any().with_content_type(ContentType::Json))
                .into_query();
        let result = orville.query("wilbur", json_only).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(
            result.iter().next().unwrap().block.content_type,
            ContentType::Json
        );
        wilbur.shutdown().await;
    }
}
