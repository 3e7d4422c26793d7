//! # Node Client
//!
//! `send_block` and `query` against named peers. Every operation resolves
//! the peer, checks its certificate, and then runs dial + handshake +
//! request under one timeout.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use shared_types::{Block, BlockId, Contact, Query, QueryResult};
use shared_wire::{RejectCode, Request, Response};
use tracing::{debug, info, warn};
use wn_01_contact_directory::ContactDirectory;
use wn_02_signature_service::SignatureApi;

use crate::adapters::connection::PeerConnection;
use crate::domain::config::ClientConfig;
use crate::domain::errors::ClientError;

/// Client for the Witness-Net peer protocol.
pub struct NodeClient {
    signer: Arc<dyn SignatureApi>,
    directory: Arc<ContactDirectory>,
    config: ClientConfig,
    pool: Mutex<HashMap<String, Vec<PeerConnection>>>,
    shut_down: AtomicBool,
}

impl NodeClient {
    pub fn new(signer: Arc<dyn SignatureApi>, directory: Arc<ContactDirectory>) -> Self {
        Self::with_config(signer, directory, ClientConfig::default())
    }

    pub fn with_config(
        signer: Arc<dyn SignatureApi>,
        directory: Arc<ContactDirectory>,
        config: ClientConfig,
    ) -> Self {
        Self {
            signer,
            directory,
            config,
            pool: Mutex::new(HashMap::new()),
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn directory(&self) -> &ContactDirectory {
        &self.directory
    }

    /// Deliver `block` to `peer` and return the id it acknowledged.
    ///
    /// The acknowledged id must equal the locally computed one.
    pub async fn send_block(&self, peer: &str, block: Block) -> Result<BlockId, ClientError> {
        let contact = self.resolve(peer)?;
        let expected = block.id();

        match self.request(&contact, Request::SendBlock { block }).await? {
            Response::Ack { block_id } if block_id == expected => {
                debug!(peer, block_id = %block_id, "Block acknowledged");
                Ok(block_id)
            }
            Response::Ack { block_id } => Err(ClientError::Protocol {
                peer: peer.to_string(),
                reason: format!("acknowledged {block_id}, sent {expected}"),
            }),
            other => Err(unexpected(peer, other)),
        }
    }

    /// Run `query` on `peer` and return the entries whose attestations verify.
    ///
    /// An entry is kept only if its attestation is signed by the key in the
    /// peer's contact and names the id of the block it accompanies. Entries
    /// failing either check are dropped.
    pub async fn query(&self, peer: &str, query: Query) -> Result<QueryResult, ClientError> {
        let contact = self.resolve(peer)?;
        let kind = query.kind.clone();

        let result = match self.request(&contact, Request::Query { query }).await? {
            Response::QueryResult { result } => result,
            other => return Err(unexpected(peer, other)),
        };

        let received = result.len();
        let trusted = contact.public_key();
        let verified = result.into_entries().into_iter().filter(|entry| {
            if let Err(err) = self.signer.verify_attestation(&entry.attestation, trusted) {
                warn!(peer, block_id = %entry.attestation.block_id, error = %err, "Dropping unverifiable attestation");
                return false;
            }
            if entry.block.id() != entry.attestation.block_id {
                warn!(peer, block_id = %entry.attestation.block_id, "Dropping attestation for a different block");
                return false;
            }
            true
        });
        let result = QueryResult::from_entries(verified);

        debug!(
            peer,
            kind = %kind,
            received,
            verified = result.len(),
            "Query answered"
        );
        Ok(result)
    }

    /// Idle pooled connections to `peer`.
    pub fn pooled_connections(&self, peer: &str) -> usize {
        self.pool.lock().get(peer).map_or(0, Vec::len)
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    /// Close every pooled connection. Later operations fail with
    /// [`ClientError::ShutDown`]. Calling this again is a no-op.
    pub async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }

        let drained: Vec<PeerConnection> = self
            .pool
            .lock()
            .drain()
            .flat_map(|(_, connections)| connections)
            .collect();

        let closed = drained.len();
        for connection in drained {
            connection.close().await;
        }
        info!(closed, "Node client shut down");
    }

    fn resolve(&self, peer: &str) -> Result<Contact, ClientError> {
        if self.is_shut_down() {
            return Err(ClientError::ShutDown);
        }

        let contact = self
            .directory
            .get(peer)
            .ok_or_else(|| ClientError::UnknownPeer(peer.to_string()))?
            .clone();

        self.signer
            .validate_certificate(&contact)
            .map_err(|err| ClientError::IdentityMismatch {
                peer: peer.to_string(),
                reason: err.to_string(),
            })?;

        Ok(contact)
    }

    async fn request(&self, contact: &Contact, request: Request) -> Result<Response, ClientError> {
        let after = self.config.request_timeout;
        let label = request.label();

        match tokio::time::timeout(after, self.exchange(contact, request)).await {
            Ok(response) => response,
            Err(_) => {
                warn!(peer = %contact.name, request = label, ?after, "Request timed out");
                Err(ClientError::Timeout {
                    peer: contact.name.clone(),
                    after,
                })
            }
        }
    }

    /// One request on a pooled or fresh connection. A connection that
    /// errors, times out or is told it violated the protocol is not reused.
    async fn exchange(&self, contact: &Contact, request: Request) -> Result<Response, ClientError> {
        let mut connection = match self.checkout(&contact.name) {
            Some(connection) => connection,
            None => PeerConnection::open(contact, self.signer.as_ref(), &self.directory).await?,
        };

        let response = connection.call(request).await?;

        if !matches!(
            response,
            Response::Rejected {
                code: RejectCode::ProtocolViolation,
                ..
            }
        ) {
            self.checkin(&contact.name, connection);
        }
        Ok(response)
    }

    fn checkout(&self, peer: &str) -> Option<PeerConnection> {
        self.pool.lock().get_mut(peer)?.pop()
    }

    fn checkin(&self, peer: &str, connection: PeerConnection) {
        let mut pool = self.pool.lock();
        if self.is_shut_down() {
            return;
        }
        let idle = pool.entry(peer.to_string()).or_default();
        if idle.len() < self.config.max_idle_per_peer {
            idle.push(connection);
        }
    }
}

fn unexpected(peer: &str, response: Response) -> ClientError {
    match response {
        Response::Rejected { code, reason } => ClientError::RemoteRejected {
            peer: peer.to_string(),
            code,
            reason,
        },
        other => ClientError::Protocol {
            peer: peer.to_string(),
            reason: format!("unexpected {} response", other.label()),
        },
    }
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient")
            .field("node", &self.signer.node_name())
            .field("peers", &self.directory.len())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}
