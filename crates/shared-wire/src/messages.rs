//! Wire message definitions.

use serde::{Deserialize, Serialize};
use shared_types::{Block, BlockId, PublicKey, Query, QueryResult, Signature};
use std::fmt;

use crate::codec::encoded_len;
use crate::error::WireError;

/// Bytes the enum tag adds in front of a response's fields.
const VARIANT_TAG_LEN: usize = 4;

/// Client → node messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    /// Opens a connection; the node must prove its identity over `challenge`.
    Hello { version: u16, challenge: [u8; 32] },
    /// Push a block into the node's store.
    SendBlock { block: Block },
    /// Ask the node to answer a query.
    Query { query: Query },
}

impl Request {
    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Request::Hello { .. } => "hello",
            Request::SendBlock { .. } => "send_block",
            Request::Query { .. } => "query",
        }
    }
}

/// Node → client messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    /// Handshake answer.
    Welcome {
        version: u16,
        name: String,
        public_key: PublicKey,
        proof: Signature,
    },
    /// The block was stored and every handler notified.
    Ack { block_id: BlockId },
    /// Attested matches for a query.
    QueryResult { result: QueryResult },
    /// The request failed; the connection stays usable unless the code is
    /// `ProtocolViolation`.
    Rejected { code: RejectCode, reason: String },
}

impl Response {
    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Response::Welcome { .. } => "welcome",
            Response::Ack { .. } => "ack",
            Response::QueryResult { .. } => "query_result",
            Response::Rejected { .. } => "rejected",
        }
    }

    /// Framed body length of a `QueryResult` response carrying `result`.
    ///
    /// Lets a node refuse an answer that would not fit in one frame before
    /// it tries to send it.
    pub fn query_result_len(result: &QueryResult) -> Result<usize, WireError> {
        Ok(VARIANT_TAG_LEN + encoded_len(result)?)
    }
}

/// Why a node refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectCode {
    MalformedBlock,
    UnsupportedQuery,
    HandlerFailure,
    ProtocolViolation,
}

impl fmt::Display for RejectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RejectCode::MalformedBlock => "malformed block",
            RejectCode::UnsupportedQuery => "unsupported query",
            RejectCode::HandlerFailure => "handler failure",
            RejectCode::ProtocolViolation => "protocol violation",
        };
        f.write_str(name)
    }
}
