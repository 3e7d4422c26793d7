//! # Witness-Net Node Runtime
//!
//! Loads configuration, generates identities and runs a node.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (file path from argv or `WN_CONFIG`, `WN_LISTEN` override)
//! 2. Load the private key and validate every contact certificate
//! 3. Build store, signature service, node service and availability handler
//! 4. Bind the listener and build the node client
//! 5. Run until Ctrl+C, then shut down client and server

pub mod certificate;
pub mod config;
pub mod keygen;
pub mod runtime;

pub use config::{ConfigError, ConfigFile, ContactEntry, NodeSettings};
pub use keygen::{keygen, GeneratedIdentity};
pub use runtime::NodeRuntime;
