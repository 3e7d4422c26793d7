//! # Client Errors

use std::time::Duration;

use shared_wire::RejectCode;
use thiserror::Error;

/// Failures of a client operation. None of them are retried internally.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The peer is not in the contact directory. Nothing was dialed.
    #[error("Unknown peer: {0}")]
    UnknownPeer(String),

    /// The peer could not be reached or the connection broke.
    #[error("Connection to {peer} failed: {reason}")]
    ConnectionFailure { peer: String, reason: String },

    /// The peer's certificate or handshake proof did not match its contact.
    #[error("Identity of {peer} could not be verified: {reason}")]
    IdentityMismatch { peer: String, reason: String },

    /// The peer answered with a rejection.
    #[error("{peer} rejected the request ({code}): {reason}")]
    RemoteRejected {
        peer: String,
        code: RejectCode,
        reason: String,
    },

    /// The operation did not complete within the request timeout.
    #[error("Request to {peer} timed out after {after:?}")]
    Timeout { peer: String, after: Duration },

    /// The peer sent something the protocol does not allow here.
    #[error("Protocol error from {peer}: {reason}")]
    Protocol { peer: String, reason: String },

    /// The client has been shut down.
    #[error("Client is shut down")]
    ShutDown,
}
