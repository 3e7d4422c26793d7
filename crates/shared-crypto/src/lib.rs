//! # Shared Crypto - Cryptographic Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `signatures` | Ed25519 | Node identity, attestations, handshakes |
//! | `challenge` | CSPRNG | Handshake challenges |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency when signing
//! - **Secret hygiene**: Seeds are zeroized when key pairs are dropped

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod challenge;
pub mod errors;
pub mod signatures;

// Re-exports
pub use errors::CryptoError;
pub use challenge::{random_challenge, Challenge};
pub use signatures::{validate_public_key, verify_signature, Ed25519KeyPair};
