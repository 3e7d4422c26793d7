//! # Witness-Net Test Suite
//!
//! Scenarios that need more than one crate: real nodes on loopback TCP,
//! authenticated clients, pluggable handlers, and the runtime's config files.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs              # node + client builders
//! │   └── integration/
//! │       ├── attestation_flow.rs  # send → query → verify, across nodes
//! │       ├── handler_plugins.rs   # extra query kinds, failure isolation
//! │       └── runtime.rs           # config files, keygen, NodeRuntime
//! └── benches/
//!     └── witness_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p wn-tests
//! cargo test -p wn-tests integration::runtime::
//! cargo bench -p wn-tests
//! ```

pub mod fixtures;
pub mod integration;
