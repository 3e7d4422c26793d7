//! # Inbound Connection
//!
//! One task per peer. Requests on a connection are handled strictly one at
//! a time in arrival order; the next frame is not read until the previous
//! response has been written.

use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use shared_types::Block;
use shared_wire::{RejectCode, Request, Response, ServerCodec, WireError, PROTOCOL_VERSION};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::timeout;
use tokio_util::codec::Framed;
use tracing::{debug, trace, warn};
use wn_02_signature_service::SignatureApi;

use crate::domain::errors::NodeError;
use crate::domain::state::ConnectionState;
use crate::domain::stats::ServiceMetrics;
use crate::service::NodeService;

/// Why a connection loop stopped.
enum Close {
    Disconnected,
    Shutdown,
    Violation(String),
    Io(String),
}

pub(crate) struct Connection {
    framed: Framed<TcpStream, ServerCodec>,
    peer: SocketAddr,
    service: Arc<NodeService>,
    shutdown: watch::Receiver<bool>,
    state: ConnectionState,
}

impl Connection {
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        service: Arc<NodeService>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let codec = ServerCodec::with_max_frame_size(service.config().max_frame_size);
        Self {
            framed: Framed::new(stream, codec),
            peer,
            service,
            shutdown,
            state: ConnectionState::Listening,
        }
    }

    fn transition(&mut self, next: ConnectionState) {
        if !self.state.can_transition_to(next) {
            warn!(peer = %self.peer, from = %self.state, to = %next, "Illegal connection state transition");
        }
        trace!(peer = %self.peer, from = %self.state, to = %next, "Connection state");
        self.state = next;
    }

    pub async fn run(mut self) {
        let reason = match self.handshake().await {
            Ok(()) => self.serve().await,
            Err(close) => close,
        };

        match &reason {
            Close::Disconnected => debug!(peer = %self.peer, "Peer disconnected"),
            Close::Shutdown => debug!(peer = %self.peer, "Connection closed for shutdown"),
            Close::Violation(why) => {
                warn!(peer = %self.peer, reason = %why, "Protocol violation");
                let _ = self
                    .framed
                    .send(Response::Rejected {
                        code: RejectCode::ProtocolViolation,
                        reason: why.clone(),
                    })
                    .await;
            }
            Close::Io(why) => debug!(peer = %self.peer, error = %why, "Connection I/O error"),
        }
        self.transition(ConnectionState::Closed);
    }

    async fn handshake(&mut self) -> Result<(), Close> {
        self.transition(ConnectionState::Receiving);
        let limit = self.service.config().handshake_timeout;
        let first = match timeout(limit, self.next_request()).await {
            Ok(result) => result?,
            Err(_) => return Err(Close::Violation("handshake timed out".into())),
        };
        self.transition(ConnectionState::Dispatching);

        let Request::Hello { version, challenge } = first else {
            return Err(Close::Violation(format!(
                "expected hello, got {}",
                first.label()
            )));
        };
        if version != PROTOCOL_VERSION {
            return Err(Close::Violation(format!(
                "unsupported protocol version {version}"
            )));
        }

        let signer = self.service.signer();
        let welcome = Response::Welcome {
            version: PROTOCOL_VERSION,
            name: signer.node_name().to_string(),
            public_key: signer.public_key(),
            proof: signer.prove_identity(&challenge),
        };
        self.respond(welcome).await?;

        ServiceMetrics::bump(&self.service.metrics.connections_accepted);
        debug!(peer = %self.peer, "Handshake complete");
        Ok(())
    }

    async fn serve(&mut self) -> Close {
        loop {
            self.transition(ConnectionState::Receiving);
            let request = match self.next_request().await {
                Ok(request) => request,
                Err(close) => return close,
            };

            self.transition(ConnectionState::Dispatching);
            trace!(peer = %self.peer, request = request.label(), "Dispatching request");
            let response = match request {
                Request::Hello { .. } => return Close::Violation("repeated hello".into()),
                Request::SendBlock { block } => self.receive_block(block).await,
                Request::Query { query } => {
                    let service = Arc::clone(&self.service);
                    let outcome = tokio::task::spawn_blocking(move || service.on_query(&query)).await;
                    match outcome {
                        Ok(Ok(result)) => Response::QueryResult { result },
                        Ok(Err(err)) => rejected(&err),
                        Err(e) => internal_failure(e),
                    }
                }
            };

            if let Err(close) = self.respond(response).await {
                return close;
            }
        }
    }

    async fn receive_block(&self, block: Block) -> Response {
        let service = Arc::clone(&self.service);
        match tokio::task::spawn_blocking(move || service.on_block_received(block)).await {
            Ok(Ok(block_id)) => Response::Ack { block_id },
            Ok(Err(err)) => rejected(&err),
            Err(e) => internal_failure(e),
        }
    }

    /// Next request, or the reason the connection must close.
    async fn next_request(&mut self) -> Result<Request, Close> {
        if *self.shutdown.borrow() {
            return Err(Close::Shutdown);
        }
        tokio::select! {
            _ = self.shutdown.changed() => Err(Close::Shutdown),
            frame = self.framed.next() => match frame {
                None => Err(Close::Disconnected),
                Some(Ok(request)) => Ok(request),
                Some(Err(e)) => Err(Close::Violation(e.to_string())),
            },
        }
    }

    /// Write `response`. A response that cannot be framed is replaced by a
    /// `HandlerFailure` rejection; only transport errors close the connection.
    async fn respond(&mut self, response: Response) -> Result<(), Close> {
        let label = response.label();
        match self.framed.send(response).await {
            Ok(()) => {}
            Err(WireError::Io(e)) => return Err(Close::Io(e.to_string())),
            Err(e) => {
                warn!(peer = %self.peer, response = label, error = %e, "Response could not be framed");
                self.framed
                    .send(Response::Rejected {
                        code: RejectCode::HandlerFailure,
                        reason: format!("{label} response exceeds frame limit"),
                    })
                    .await
                    .map_err(|e| Close::Io(e.to_string()))?;
            }
        }
        self.transition(ConnectionState::Idle);
        Ok(())
    }
}

fn rejected(err: &NodeError) -> Response {
    Response::Rejected {
        code: err.reject_code(),
        reason: err.to_string(),
    }
}

fn internal_failure(err: tokio::task::JoinError) -> Response {
    warn!(error = %err, "Request task failed");
    Response::Rejected {
        code: RejectCode::HandlerFailure,
        reason: "internal error".into(),
    }
}
