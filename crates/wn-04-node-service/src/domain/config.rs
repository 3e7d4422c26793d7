//! # Service Configuration

use std::time::Duration;

use shared_wire::MAX_FRAME_SIZE;

/// Default time a peer has to send `Hello` after connecting.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Network-facing settings of a node service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Time allowed for the opening `Hello`.
    pub handshake_timeout: Duration,
    /// Largest accepted frame body.
    pub max_frame_size: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            max_frame_size: MAX_FRAME_SIZE,
        }
    }
}
