//! # Shared Wire - Peer Protocol
//!
//! Two request/response exchanges travel between peers, preceded by an
//! identity handshake on every connection:
//!
//! ```text
//! client                                   node service
//!   │ ── Hello { challenge } ───────────────→ │
//!   │ ←─────────── Welcome { name, key, proof }│   proof = sign(challenge)
//!   │ ── SendBlock { block } ───────────────→ │
//!   │ ←────────────────────── Ack { block_id } │
//!   │ ── Query { query } ───────────────────→ │
//!   │ ←──────────────── QueryResult { result } │
//! ```
//!
//! Any request may instead be answered with `Rejected { code, reason }`.
//! The proof covers `shared_types::handshake_signing_bytes`.
//!
//! ## Framing
//!
//! - 4 bytes: network magic
//! - 4 bytes: big-endian body length
//! - N bytes: bincode-encoded message

pub mod codec;
pub mod error;
pub mod messages;

pub use codec::{encoded_len, ClientCodec, FrameCodec, ServerCodec};
pub use error::WireError;
pub use messages::{RejectCode, Request, Response};

/// Current wire protocol version.
pub const PROTOCOL_VERSION: u16 = 1;

/// Magic prefix of every frame.
pub const NETWORK_MAGIC: [u8; 4] = *b"WNET";

/// Upper bound on a frame body.
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;
