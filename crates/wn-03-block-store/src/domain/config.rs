//! # Store Configuration

/// Default maximum payload size (1 MiB).
pub const DEFAULT_MAX_BLOCK_SIZE: usize = 1024 * 1024;

/// Configuration for a block store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Largest accepted payload, in bytes.
    pub max_block_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_block_size: DEFAULT_MAX_BLOCK_SIZE,
        }
    }
}

impl StoreConfig {
    pub fn with_max_block_size(mut self, max_block_size: usize) -> Self {
        self.max_block_size = max_block_size;
        self
    }
}
