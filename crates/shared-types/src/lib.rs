//! # Shared Types Crate
//!
//! This crate contains the domain entities exchanged between Witness-Net
//! components and between peers on the wire.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Block, Contact, Query and Attestation are
//!   defined once here and reused by every crate.
//! - **Content Addressing**: A block's identity is the SHA-256 of its
//!   canonical encoding. Nothing else identifies a block.
//! - **Immutable Values**: Blocks, contacts and queries are never mutated
//!   after construction.
//!
//! ## Clusters
//!
//! - `entities` - Block, `BlockId`, `ContentType`
//! - `identity` - `PublicKey`, `Signature`, `NodeCertificate`, `Contact`
//! - `query` - Query, `QueryKind`, Attestation, `QueryResult`

pub mod entities;
pub mod errors;
pub mod identity;
pub mod query;

pub use entities::*;
pub use errors::*;
pub use identity::*;
pub use query::*;
