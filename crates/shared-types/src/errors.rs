//! # Error Types
//!
//! Errors raised while constructing shared value types.

use thiserror::Error;

/// Invalid construction of a shared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Query kind tag is empty, too long, or contains non-printable bytes.
    #[error("Invalid query kind tag: {tag:?}")]
    InvalidQueryKind { tag: String },
}
