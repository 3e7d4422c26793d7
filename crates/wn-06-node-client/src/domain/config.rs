//! # Client Configuration

use std::time::Duration;

/// Default bound on one client operation, connection setup included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of idle connections kept per peer.
pub const DEFAULT_MAX_IDLE_PER_PEER: usize = 4;

/// Client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Upper bound on a whole operation: dial, handshake, request, response.
    pub request_timeout: Duration,
    /// Idle connections retained per peer; extras are closed.
    pub max_idle_per_peer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_idle_per_peer: DEFAULT_MAX_IDLE_PER_PEER,
        }
    }
}

impl ClientConfig {
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}
