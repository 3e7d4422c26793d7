//! # Block Templates
//!
//! Structural patterns over blocks and their payload encoding.

use serde::{Deserialize, Serialize};
use shared_types::{Block, BlockId, ContentType, Query};
use wn_04_node_service::HandlerError;

use crate::handler::availability_kind;

/// A pattern over blocks. `None` fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTemplate {
    pub id: Option<BlockId>,
    pub content_type: Option<ContentType>,
    pub payload: Option<Vec<u8>>,
}

impl BlockTemplate {
    /// Matches every block.
    pub fn any() -> Self {
        Self::default()
    }

    /// Matches exactly `block`.
    pub fn exact(block: &Block) -> Self {
        Self {
            id: Some(block.id()),
            content_type: Some(block.content_type),
            payload: Some(block.payload.clone()),
        }
    }

    pub fn with_id(mut self, id: BlockId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Whether `block` (stored under `id`) satisfies every declared field.
    pub fn matches(&self, id: &BlockId, block: &Block) -> bool {
        self.id.as_ref().map_or(true, |want| want == id)
            && self
                .content_type
                .map_or(true, |want| want == block.content_type)
            && self
                .payload
                .as_deref()
                .map_or(true, |want| want == block.payload.as_slice())
    }
}

/// Payload of an `availability/v1` query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub template: BlockTemplate,
}

impl AvailabilityQuery {
    pub fn new(template: BlockTemplate) -> Self {
        Self { template }
    }

    /// Encode as a query payload.
    ///
    /// # Panics
    ///
    /// Panics if bincode fails to serialize the template. The template is
    /// plain owned data written into a `Vec`, which bincode always accepts.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match bincode::serialize(self) {
            Ok(bytes) => bytes,
            Err(err) => panic!("availability query failed to encode: {err}"),
        }
    }

    /// Decode a query payload.
    pub fn decode(payload: &[u8]) -> Result<Self, HandlerError> {
        bincode::deserialize(payload).map_err(|e| HandlerError::MalformedQuery(e.to_string()))
    }

    /// Wrap as a [`Query`] addressed to the availability handler.
    pub fn into_query(self) -> Query {
        Query::new(availability_kind(), self.encode())
    }
}
