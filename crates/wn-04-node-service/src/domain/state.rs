//! # Connection State Machine
//!
//! ```text
//!  Listening ──frame──→ Receiving ──→ Dispatching ──→ Idle
//!                           ↑                           │
//!                           └────────── frame ──────────┘
//!
//!  any state ── disconnect / violation / shutdown ──→ Closed
//! ```
//!
//! The first frame on every connection must be the handshake `Hello`.

use std::fmt;

/// Lifecycle of one inbound connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Accepted; no frame read yet.
    Listening,
    /// A request frame is being read.
    Receiving,
    /// A request is being processed.
    Dispatching,
    /// The last response has been sent.
    Idle,
    /// Terminal.
    Closed,
}

impl ConnectionState {
    /// Whether `self → next` is a legal transition.
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        match (self, next) {
            (Closed, _) => false,
            (_, Closed) => true,
            (Listening, Receiving) | (Idle, Receiving) => true,
            (Receiving, Dispatching) => true,
            (Dispatching, Idle) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Listening => "listening",
            ConnectionState::Receiving => "receiving",
            ConnectionState::Dispatching => "dispatching",
            ConnectionState::Idle => "idle",
            ConnectionState::Closed => "closed",
        };
        f.write_str(name)
    }
}
