//! # Node Client (WN-06)
//!
//! Sends blocks and queries to named peers.
//!
//! ## Trust Flow
//!
//! ```text
//! send_block("wilbur", B) / query("wilbur", Q)
//!     │
//!     ├─ ContactDirectory: "wilbur" → address + certificate   (UnknownPeer)
//!     ├─ SignatureApi: certificate self-signature             (IdentityMismatch)
//!     ├─ TCP + Hello(challenge) → Welcome(proof)              (IdentityMismatch)
//!     ├─ request / response under request_timeout             (Timeout)
//!     └─ every attestation checked against wilbur's key       (entry dropped)
//! ```
//!
//! Connections are pooled per peer and reused until they fail, time out or
//! the client shuts down. Operations are never retried internally.

//! ## Crate Structure
//!
//! - `domain/` - `ClientConfig`, `ClientError`
//! - `adapters/` - authenticated TCP connection to one peer
//! - `client` - `NodeClient`: resolution, pooling, verification

mod adapters;
pub mod client;
pub mod domain;

pub use client::NodeClient;
pub use domain::config::ClientConfig;
pub use domain::errors::ClientError;
pub use shared_wire::RejectCode;
