//! # Block Store (WN-03)
//!
//! The single source of truth for blocks a node has accepted.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Content Addressing | A block is reachable by its id and only by its id |
//! | 2 | Idempotent Insert | Re-inserting a present block is a no-op returning the same id |
//! | 3 | Linearizable Writes | Concurrent puts never tear or lose an insert |
//! | 4 | Bounded Blocks | Empty or oversized payloads are rejected |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - configuration, validation, errors
//! - `ports/` - the `BlockStore` trait and scan snapshot
//! - `adapters/` - `InMemoryBlockStore`
//!
//! ## Usage
//!
//! ```ignore
//! use wn_03_block_store::{BlockStore, InMemoryBlockStore, StoreConfig};
//!
//! let store = InMemoryBlockStore::new(StoreConfig::default());
//! let id = store.put(Block::text("block contents"))?;
//! assert_eq!(store.get(&id)?.payload_str(), Some("block contents"));
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::memory::InMemoryBlockStore;
pub use domain::config::StoreConfig;
pub use domain::errors::BlockStoreError;
pub use domain::validation::validate_block;
pub use ports::inbound::{BlockScan, BlockStore, PutOutcome};
