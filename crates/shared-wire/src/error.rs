//! Wire-level errors.

use thiserror::Error;

/// Errors raised while framing or decoding peer messages.
#[derive(Debug, Error)]
pub enum WireError {
    /// Frame did not start with the network magic.
    #[error("Invalid magic bytes: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Frame body exceeds the configured limit.
    #[error("Frame too large: {size} bytes, max {max}")]
    FrameTooLarge { size: usize, max: usize },

    /// Body could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(String),

    /// Underlying transport failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<bincode::Error> for WireError {
    fn from(err: bincode::Error) -> Self {
        WireError::Codec(err.to_string())
    }
}
