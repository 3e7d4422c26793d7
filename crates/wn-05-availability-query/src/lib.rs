//! # Availability Query (WN-05)
//!
//! Answers "which of these blocks do you hold?" with proof.
//!
//! A query carries a [`BlockTemplate`]; every field left `None` is a
//! wildcard. The handler returns each stored block that matches every
//! declared field, paired with an attestation signed at query time.
//!
//! ```ignore
//! let query = AvailabilityQuery::new(BlockTemplate::exact(&block)).into_query();
//! let result = node.on_query(&query)?;
//! ```

pub mod domain;
pub mod handler;

pub use domain::template::{AvailabilityQuery, BlockTemplate};
pub use handler::{availability_kind, AvailabilityQueryHandler, AVAILABILITY_KIND};
