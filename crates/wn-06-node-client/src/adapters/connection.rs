//! # Outbound Connection
//!
//! A framed TCP stream to one peer whose identity has been proven by the
//! challenge handshake.

use futures::{SinkExt, StreamExt};
use shared_crypto::random_challenge;
use shared_types::Contact;
use shared_wire::{ClientCodec, Request, Response, PROTOCOL_VERSION};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::debug;
use wn_01_contact_directory::ContactDirectory;
use wn_02_signature_service::SignatureApi;

use crate::domain::errors::ClientError;

pub(crate) struct PeerConnection {
    peer: String,
    framed: Framed<TcpStream, ClientCodec>,
}

impl PeerConnection {
    /// Dial `contact` and authenticate it.
    ///
    /// A peer answering with another contact's key is named in the error.
    pub async fn open(
        contact: &Contact,
        signer: &dyn SignatureApi,
        directory: &ContactDirectory,
    ) -> Result<Self, ClientError> {
        let peer = contact.name.clone();
        let stream = TcpStream::connect(contact.address)
            .await
            .map_err(|e| ClientError::ConnectionFailure {
                peer: peer.clone(),
                reason: e.to_string(),
            })?;
        let _ = stream.set_nodelay(true);

        let mut connection = Self {
            peer,
            framed: Framed::new(stream, ClientCodec::new()),
        };

        let challenge = random_challenge();
        let welcome = connection
            .call(Request::Hello {
                version: PROTOCOL_VERSION,
                challenge,
            })
            .await?;

        match welcome {
            Response::Welcome {
                version,
                name,
                public_key,
                proof,
            } => {
                if version != PROTOCOL_VERSION {
                    return Err(connection.protocol(format!("unsupported protocol version {version}")));
                }
                if name != contact.name || public_key != *contact.public_key() {
                    let presented = match directory.by_public_key(&public_key) {
                        Some(known) if known.name != contact.name => {
                            format!("{name} holding the key of contact {}", known.name)
                        }
                        _ => format!("{name} with key {public_key}"),
                    };
                    return Err(connection.mismatch(format!(
                        "expected {} with key {}, got {presented}",
                        contact.name,
                        contact.public_key()
                    )));
                }
                if !signer.verify_identity(contact, &challenge, &proof) {
                    return Err(connection.mismatch("handshake proof does not verify".into()));
                }
            }
            Response::Rejected { code, reason } => {
                return Err(ClientError::RemoteRejected {
                    peer: connection.peer,
                    code,
                    reason,
                })
            }
            other => {
                return Err(connection.protocol(format!("expected welcome, got {}", other.label())))
            }
        }

        debug!(peer = %connection.peer, address = %contact.address, "Peer authenticated");
        Ok(connection)
    }

    /// Send one request and read its response.
    pub async fn call(&mut self, request: Request) -> Result<Response, ClientError> {
        self.framed
            .send(request)
            .await
            .map_err(|e| self.failure(e.to_string()))?;

        match self.framed.next().await {
            Some(Ok(response)) => Ok(response),
            Some(Err(e)) => Err(self.protocol(e.to_string())),
            None => Err(self.failure("connection closed by peer".into())),
        }
    }

    /// Flush and close the stream.
    pub async fn close(mut self) {
        let _ = SinkExt::<Request>::close(&mut self.framed).await;
    }

    fn failure(&self, reason: String) -> ClientError {
        ClientError::ConnectionFailure {
            peer: self.peer.clone(),
            reason,
        }
    }

    fn protocol(&self, reason: String) -> ClientError {
        ClientError::Protocol {
            peer: self.peer.clone(),
            reason,
        }
    }

    fn mismatch(&self, reason: String) -> ClientError {
        ClientError::IdentityMismatch {
            peer: self.peer.clone(),
            reason,
        }
    }
}
