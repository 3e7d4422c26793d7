//! # Node Runtime
//!
//! Wires one node together:
//!
//! ```text
//! NodeSettings
//!     ├─ identity ──→ SignatureService ──┬─→ NodeService ──bind──→ RunningNode
//!     ├─ store ─────→ InMemoryBlockStore ┘        ▲
//!     │                                           └── AvailabilityQueryHandler
//!     └─ directory + client ──→ NodeClient
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use wn_02_signature_service::{SignatureApi, SignatureService};
use wn_03_block_store::{BlockStore, InMemoryBlockStore};
use wn_04_node_service::{NodeService, NodeStats, RunningNode};
use wn_05_availability_query::AvailabilityQueryHandler;
use wn_06_node_client::NodeClient;

use crate::config::NodeSettings;

/// A running node: the listening service plus a client for its contacts.
pub struct NodeRuntime {
    node: RunningNode,
    client: Arc<NodeClient>,
    availability: Arc<AvailabilityQueryHandler>,
}

impl NodeRuntime {
    /// Build every component and start listening on `settings.listen`.
    pub async fn start(settings: NodeSettings) -> Result<Self> {
        let NodeSettings {
            identity,
            listen,
            store,
            client,
            directory,
        } = settings;

        let signer = Arc::new(SignatureService::new(identity));
        let store: Arc<dyn BlockStore> = Arc::new(InMemoryBlockStore::new(store));

        let service = NodeService::new(store, Arc::clone(&signer));
        let availability = Arc::new(AvailabilityQueryHandler::new(signer.clone()));
        service
            .register_query_handler(availability.clone())
            .context("Failed to register availability handler")?;

        let node = Arc::new(service)
            .bind(listen)
            .await
            .with_context(|| format!("Failed to listen on {listen}"))?;

        let client = Arc::new(NodeClient::with_config(
            signer.clone(),
            Arc::new(directory),
            client,
        ));

        info!(
            node = %signer.node_name(),
            address = %node.local_addr(),
            peers = client.directory().len(),
            "Node runtime started"
        );

        Ok(Self {
            node,
            client,
            availability,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.node.local_addr()
    }

    pub fn service(&self) -> &Arc<NodeService> {
        self.node.service()
    }

    /// Client for this node's contacts.
    pub fn client(&self) -> &Arc<NodeClient> {
        &self.client
    }

    pub fn availability(&self) -> &AvailabilityQueryHandler {
        &self.availability
    }

    pub fn stats(&self) -> NodeStats {
        self.node.service().stats()
    }

    /// Close client connections, then stop accepting and drain the server.
    pub async fn shutdown(self) {
        info!("Initiating graceful shutdown...");
        self.client.shutdown().await;
        let stats = self.node.service().stats();
        self.node.shutdown().await;
        info!(
            blocks_stored = stats.blocks_stored,
            queries_served = stats.queries_served,
            "Shutdown complete"
        );
    }
}
