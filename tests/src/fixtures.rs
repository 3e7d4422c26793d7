//! Builders shared by the integration scenarios.

use std::net::SocketAddr;
use std::sync::Arc;

use shared_types::Contact;
use wn_01_contact_directory::ContactDirectory;
use wn_02_signature_service::{NodeIdentity, SignatureApi, SignatureService};
use wn_03_block_store::{BlockStore, InMemoryBlockStore, StoreConfig};
use wn_04_node_service::{NodeService, QueryHandler, RunningNode};
use wn_05_availability_query::AvailabilityQueryHandler;
use wn_06_node_client::{ClientConfig, NodeClient};

/// A node listening on loopback with the availability handler registered.
pub struct TestNode {
    pub identity: Arc<NodeIdentity>,
    pub signer: Arc<SignatureService>,
    pub availability: Arc<AvailabilityQueryHandler>,
    pub running: RunningNode,
}

impl TestNode {
    pub async fn start(name: &str) -> Self {
        Self::start_with(name, Vec::new()).await
    }

    /// Start with `extra` handlers registered after the availability handler.
    pub async fn start_with(name: &str, extra: Vec<Arc<dyn QueryHandler>>) -> Self {
        let identity = Arc::new(NodeIdentity::generate(name));
        let signer = Arc::new(SignatureService::new(Arc::clone(&identity)));
        let store: Arc<dyn BlockStore> = Arc::new(InMemoryBlockStore::new(StoreConfig::default()));

        let service = NodeService::new(store, Arc::clone(&signer));
        let availability = Arc::new(AvailabilityQueryHandler::new(signer.clone()));
        service
            .register_query_handler(availability.clone())
            .expect("availability handler");
        for handler in extra {
            service.register_query_handler(handler).expect("extra handler");
        }

        let addr: SocketAddr = "127.0.0.1:0".parse().expect("loopback");
        let running = Arc::new(service).bind(addr).await.expect("bind");

        Self {
            identity,
            signer,
            availability,
            running,
        }
    }

    pub fn contact(&self) -> Contact {
        self.identity.contact(self.running.local_addr())
    }

    pub fn service(&self) -> &Arc<NodeService> {
        self.running.service()
    }

    pub async fn shutdown(self) {
        self.running.shutdown().await;
    }
}

/// A client named `name` that trusts exactly `peers`.
pub fn client(name: &str, peers: &[&TestNode]) -> NodeClient {
    client_with(name, peers, ClientConfig::default())
}

pub fn client_with(name: &str, peers: &[&TestNode], config: ClientConfig) -> NodeClient {
    let signer: Arc<dyn SignatureApi> =
        Arc::new(SignatureService::new(Arc::new(NodeIdentity::generate(name))));
    let directory =
        ContactDirectory::new(peers.iter().map(|node| node.contact())).expect("directory");
    NodeClient::with_config(signer, Arc::new(directory), config)
}
