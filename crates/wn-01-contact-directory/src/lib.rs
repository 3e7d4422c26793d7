//! # Contact Directory (WN-01)
//!
//! Maps peer names to their network address and certificate.
//!
//! The directory is built once from configuration and never changes
//! afterwards. Every component that needs to reach or trust a peer holds an
//! `Arc<ContactDirectory>`; there is no global instance.
//!
//! Certificates are stored as-is. Verifying them is the signature service's
//! job, done at startup by the runtime and again by the client before dialing.

pub mod domain;

pub use domain::directory::ContactDirectory;
pub use domain::errors::DirectoryError;
