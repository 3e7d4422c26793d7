//! # Block Validation
//!
//! Structural checks applied before a block is admitted.

use serde::de::IgnoredAny;
use shared_types::{Block, ContentType};

use super::config::StoreConfig;
use super::errors::BlockStoreError;

/// Check that `block` may be stored under `config`.
///
/// - the payload is non-empty and within `max_block_size`
/// - `Text` payloads are UTF-8
/// - `Json` payloads parse as a single JSON value
pub fn validate_block(block: &Block, config: &StoreConfig) -> Result<(), BlockStoreError> {
    if block.payload.is_empty() {
        return Err(BlockStoreError::malformed("empty payload"));
    }
    if block.size() > config.max_block_size {
        return Err(BlockStoreError::BlockTooLarge {
            size: block.size(),
            max_size: config.max_block_size,
        });
    }

    match block.content_type {
        ContentType::Raw => {}
        ContentType::Text => {
            if block.payload_str().is_none() {
                return Err(BlockStoreError::malformed("text payload is not UTF-8"));
            }
        }
        ContentType::Json => {
            serde_json::from_slice::<IgnoredAny>(&block.payload)
                .map_err(|e| BlockStoreError::malformed(format!("invalid JSON payload: {e}")))?;
        }
    }

    Ok(())
}
