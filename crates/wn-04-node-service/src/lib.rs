//! # Node Service (WN-04)
//!
//! Accepts blocks from clients, stores them, tells every registered query
//! handler about them, and routes queries to the handler for their kind.
//!
//! ## Architecture
//!
//! ```text
//!            TCP (shared-wire frames)
//!                     │
//!        ┌────────────▼────────────┐
//!        │ adapters::connection     │  one task per peer, handshake first
//!        └────────────┬────────────┘
//!                     │
//!        ┌────────────▼────────────┐
//!        │ service::NodeService     │──→ BlockStore (wn-03)
//!        │  on_block_received       │──→ QueryHandler fan-out
//!        │  on_query                │──→ QueryHandler by kind
//!        └──────────────────────────┘
//! ```
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - errors, connection state machine, counters, config
//! - `ports/` - the `QueryHandler` plug-in trait
//! - `service/` - intake, fan-out and dispatch
//! - `adapters/` - TCP listener and per-connection protocol loop

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

pub use adapters::RunningNode;
pub use domain::config::NodeConfig;
pub use domain::errors::{HandlerError, NodeError};
pub use domain::state::ConnectionState;
pub use domain::stats::NodeStats;
pub use ports::inbound::QueryHandler;
pub use service::{HandlerRegistry, NodeService};
