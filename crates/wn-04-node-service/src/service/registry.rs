//! # Handler Registry
//!
//! Ordered list of handlers (the notification fan-out) plus a kind index
//! (query dispatch), kept under one lock so both always agree.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::QueryKind;

use crate::domain::errors::NodeError;
use crate::ports::inbound::QueryHandler;

#[derive(Default)]
struct Inner {
    ordered: Vec<Arc<dyn QueryHandler>>,
    by_kind: HashMap<QueryKind, Arc<dyn QueryHandler>>,
}

/// Registered query handlers.
#[derive(Default)]
pub struct HandlerRegistry {
    inner: RwLock<Inner>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler`; fails if its kind is taken.
    pub fn register(&self, handler: Arc<dyn QueryHandler>) -> Result<(), NodeError> {
        let kind = handler.kind().clone();
        let mut inner = self.inner.write();
        if inner.by_kind.contains_key(&kind) {
            return Err(NodeError::DuplicateHandler { kind });
        }
        inner.ordered.push(Arc::clone(&handler));
        inner.by_kind.insert(kind, handler);
        Ok(())
    }

    /// Handler for `kind`, if any.
    pub fn get(&self, kind: &QueryKind) -> Option<Arc<dyn QueryHandler>> {
        self.inner.read().by_kind.get(kind).cloned()
    }

    /// Handlers in registration order.
    ///
    /// Returns a copy so callers can notify without holding the lock.
    pub fn snapshot(&self) -> Vec<Arc<dyn QueryHandler>> {
        self.inner.read().ordered.clone()
    }

    /// Registered kinds in registration order.
    pub fn kinds(&self) -> Vec<QueryKind> {
        self.inner
            .read()
            .ordered
            .iter()
            .map(|h| h.kind().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
