//! # Signature Service (WN-02)
//!
//! Everything a node signs or checks goes through this crate.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): node identity and errors
//! - **Ports Layer** (`ports/`): the `SignatureApi` trait consumed by query handlers
//! - **Service Layer** (`service.rs`): `SignatureService`, bound to one `NodeIdentity`
//!
//! ## Signed Messages
//!
//! | Message | Signed bytes |
//! |---------|--------------|
//! | Certificate | `"witness-net/certificate/v1" \|\| len(subject) \|\| subject \|\| key` |
//! | Attestation | `"witness-net/attestation/v1" \|\| block_id` |
//! | Handshake proof | `"witness-net/handshake/v1" \|\| challenge \|\| name` |
//!
//! Distinct domain prefixes keep a signature from one context from being
//! replayed in another.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::errors::SignatureError;
pub use domain::identity::NodeIdentity;
pub use ports::inbound::SignatureApi;
pub use service::SignatureService;
