//! # Service Metrics
//!
//! Lock-free counters updated on the intake and query paths, read as a
//! point-in-time [`NodeStats`] snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of service counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStats {
    /// Blocks offered to `on_block_received`.
    pub blocks_received: u64,
    /// Blocks that were new to the store.
    pub blocks_stored: u64,
    /// Blocks that were already stored.
    pub duplicate_blocks: u64,
    /// Blocks that failed validation.
    pub blocks_rejected: u64,
    /// Handler notifications that returned an error or panicked.
    pub notification_failures: u64,
    /// Queries answered successfully.
    pub queries_served: u64,
    /// Queries that failed (unsupported kind or handler failure).
    pub queries_rejected: u64,
    /// Inbound connections that completed the handshake.
    pub connections_accepted: u64,
}

#[derive(Debug, Default)]
pub(crate) struct ServiceMetrics {
    pub blocks_received: AtomicU64,
    pub blocks_stored: AtomicU64,
    pub duplicate_blocks: AtomicU64,
    pub blocks_rejected: AtomicU64,
    pub notification_failures: AtomicU64,
    pub queries_served: AtomicU64,
    pub queries_rejected: AtomicU64,
    pub connections_accepted: AtomicU64,
}

impl ServiceMetrics {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> NodeStats {
        NodeStats {
            blocks_received: self.blocks_received.load(Ordering::Relaxed),
            blocks_stored: self.blocks_stored.load(Ordering::Relaxed),
            duplicate_blocks: self.duplicate_blocks.load(Ordering::Relaxed),
            blocks_rejected: self.blocks_rejected.load(Ordering::Relaxed),
            notification_failures: self.notification_failures.load(Ordering::Relaxed),
            queries_served: self.queries_served.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            connections_accepted: self.connections_accepted.load(Ordering::Relaxed),
        }
    }
}
