//! # Runtime From Config Files
//!
//! Two nodes built the way the binary builds them: identities from
//! `keygen`, settings from TOML, everything wired by `NodeRuntime`.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use node_runtime::{keygen, NodeRuntime, NodeSettings};
    use shared_types::Block;
    use wn_05_availability_query::{AvailabilityQuery, BlockTemplate};
    use wn_06_node_client::ClientError;

    fn write_config(dir: &Path, name: &str, contacts: &[(&str, u16)]) -> PathBuf {
        let mut text = format!(
            "name = \"{name}\"\nprivate_key = \"keys/{name}.key\"\nlisten = \"127.0.0.1:0\"\nrequest_timeout_ms = 2000\n"
        );
        for (peer, port) in contacts {
            text.push_str(&format!(
                "\n[contacts.{peer}]\ncertificate = \"keys/{peer}.json\"\nhost = \"127.0.0.1\"\nport = {port}\n"
            ));
        }
        let path = dir.join(format!("{name}.toml"));
        fs::write(&path, text).unwrap();
        path
    }

    #[tokio::test]
    async fn test_two_runtimes_exchange_and_attest() {
        let dir = tempfile::tempdir().unwrap();
        let keys = dir.path().join("keys");
        keygen("wilbur", &keys).unwrap();
        keygen("orville", &keys).unwrap();

        let orville_config = write_config(dir.path(), "orville", &[]);
        let orville = NodeRuntime::start(NodeSettings::load(&orville_config, None).unwrap())
            .await
            .unwrap();

        let wilbur_config = write_config(
            dir.path(),
            "wilbur",
            &[("orville", orville.local_addr().port())],
        );
        let wilbur = NodeRuntime::start(NodeSettings::load(&wilbur_config, None).unwrap())
            .await
            .unwrap();

        let block = Block::text("block contents");
        let id = wilbur
            .client()
            .send_block("orville", block.clone())
            .await
            .unwrap();
        let result = wilbur
            .client()
            .query(
                "orville",
                AvailabilityQuery::new(BlockTemplate::exact(&block)).into_query(),
            )
            .await
            .unwrap();

        assert_eq!(id, block.id());
        assert_eq!(result.len(), 1);
        assert_eq!(orville.stats().blocks_stored, 1);
        assert_eq!(orville.availability().blocks_observed(), 1);
        assert_eq!(wilbur.stats().blocks_stored, 0);

        // orville has no contacts, so it cannot reach wilbur by name.
        let err = orville
            .client()
            .send_block("wilbur", Block::text("reply"))
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::UnknownPeer("wilbur".into()));

        wilbur.shutdown().await;
        orville.shutdown().await;
    }

    #[tokio::test]
    async fn test_runtime_shutdown_closes_its_client() {
        let dir = tempfile::tempdir().unwrap();
        keygen("wilbur", &dir.path().join("keys")).unwrap();
        let config = write_config(dir.path(), "wilbur", &[]);
        let wilbur = NodeRuntime::start(NodeSettings::load(&config, None).unwrap())
            .await
            .unwrap();
        let client = std::sync::Arc::clone(wilbur.client());

        wilbur.shutdown().await;

        assert!(client.is_shut_down());
    }

    #[tokio::test]
    async fn test_occupied_listen_address_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        keygen("wilbur", &dir.path().join("keys")).unwrap();
        let config = write_config(dir.path(), "wilbur", &[]);
        let first = NodeRuntime::start(NodeSettings::load(&config, None).unwrap())
            .await
            .unwrap();

        let taken = first.local_addr().to_string();
        let second = NodeRuntime::start(NodeSettings::load(&config, Some(&taken)).unwrap()).await;

        assert!(second.is_err());
        first.shutdown().await;
    }
}
