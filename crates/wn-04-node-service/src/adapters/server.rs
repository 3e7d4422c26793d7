//! # Listener
//!
//! `NodeService::bind` spawns an accept loop; each accepted socket gets its
//! own task. A `watch` channel carries the shutdown signal to the loop and
//! to every connection task.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use super::connection::Connection;
use crate::domain::errors::NodeError;
use crate::service::NodeService;

impl NodeService {
    /// Listen on `addr` and serve peers until the returned handle is shut
    /// down or dropped.
    ///
    /// Bind to port 0 to let the OS choose; read it back from
    /// [`RunningNode::local_addr`].
    pub async fn bind(self: Arc<Self>, addr: SocketAddr) -> Result<RunningNode, NodeError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| NodeError::Bind(format!("{addr}: {e}")))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| NodeError::Bind(e.to_string()))?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let accept_task = tokio::spawn(accept_loop(listener, Arc::clone(&self), shutdown_rx));

        info!(
            node = %self.signer().identity().name(),
            address = %local_addr,
            "Node service listening"
        );

        Ok(RunningNode {
            local_addr,
            service: self,
            shutdown_tx,
            accept_task: Some(accept_task),
        })
    }
}

async fn accept_loop(
    listener: TcpListener,
    service: Arc<NodeService>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    debug!(peer = %peer, "Connection accepted");
                    let connection =
                        Connection::new(stream, peer, Arc::clone(&service), shutdown_rx.clone());
                    connections.spawn(connection.run());
                }
                Err(e) => warn!(error = %e, "Accept failed"),
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
        }
    }

    drop(listener);
    while connections.join_next().await.is_some() {}
    info!("Node service stopped");
}

/// Handle to a listening node service.
pub struct RunningNode {
    local_addr: SocketAddr,
    service: Arc<NodeService>,
    shutdown_tx: watch::Sender<bool>,
    accept_task: Option<JoinHandle<()>>,
}

impl RunningNode {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn service(&self) -> &Arc<NodeService> {
        &self.service
    }

    /// Stop accepting, close every connection and wait for their tasks.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(task) = self.accept_task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Accept loop ended abnormally");
            }
        }
    }
}

impl Drop for RunningNode {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl std::fmt::Debug for RunningNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunningNode")
            .field("local_addr", &self.local_addr)
            .finish_non_exhaustive()
    }
}
