//! # Node Service Errors

use shared_types::QueryKind;
use shared_wire::RejectCode;
use thiserror::Error;
use wn_03_block_store::BlockStoreError;

/// Errors returned to callers of the node service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NodeError {
    /// The block failed validation and was not stored.
    #[error("Malformed block: {reason}")]
    MalformedBlock { reason: String },

    /// No handler is registered for this query kind.
    #[error("Unsupported query kind: {kind}")]
    UnsupportedQuery { kind: QueryKind },

    /// The handler for this kind failed while answering.
    #[error("Handler for {kind} failed: {reason}")]
    HandlerFailure { kind: QueryKind, reason: String },

    /// The answer would not fit in one response frame.
    #[error("Result for {kind} exceeds frame limit: {size} bytes, max {max}")]
    ResultTooLarge {
        kind: QueryKind,
        size: usize,
        max: usize,
    },

    /// A handler for this kind is already registered.
    #[error("A handler for {kind} is already registered")]
    DuplicateHandler { kind: QueryKind },

    /// The listener could not be bound.
    #[error("Failed to bind listener: {0}")]
    Bind(String),
}

impl NodeError {
    /// Wire code used when rejecting a peer request with this error.
    pub fn reject_code(&self) -> RejectCode {
        match self {
            NodeError::MalformedBlock { .. } => RejectCode::MalformedBlock,
            NodeError::UnsupportedQuery { .. } => RejectCode::UnsupportedQuery,
            NodeError::HandlerFailure { .. }
            | NodeError::ResultTooLarge { .. }
            | NodeError::DuplicateHandler { .. }
            | NodeError::Bind(_) => RejectCode::HandlerFailure,
        }
    }
}

impl From<BlockStoreError> for NodeError {
    fn from(err: BlockStoreError) -> Self {
        NodeError::MalformedBlock {
            reason: err.to_string(),
        }
    }
}

/// Errors returned by query handlers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HandlerError {
    /// The query payload could not be decoded.
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    /// A store lookup failed.
    #[error("Store error: {0}")]
    Store(#[from] BlockStoreError),

    /// Any other handler-specific failure.
    #[error("{0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_codes() {
        let kind = QueryKind::parse("availability/v1").unwrap();
        assert_eq!(
            NodeError::UnsupportedQuery { kind: kind.clone() }.reject_code(),
            RejectCode::UnsupportedQuery
        );
        assert_eq!(
            NodeError::HandlerFailure {
                kind,
                reason: "boom".into()
            }
            .reject_code(),
            RejectCode::HandlerFailure
        );
        assert_eq!(
            NodeError::from(BlockStoreError::BlockTooLarge {
                size: 10,
                max_size: 5
            })
            .reject_code(),
            RejectCode::MalformedBlock
        );
    }
}
