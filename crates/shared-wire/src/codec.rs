//! Length-prefixed frame codec.
//!
//! One codec type serves both ends of a connection: the server decodes
//! `Request`s and encodes `Response`s, the client does the reverse.

use std::marker::PhantomData;

use bincode::Options;
use bytes::{Buf, BufMut, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::WireError;
use crate::messages::{Request, Response};
use crate::{MAX_FRAME_SIZE, NETWORK_MAGIC};

/// Header size: 4 bytes magic + 4 bytes length.
const HEADER_SIZE: usize = 8;

/// Node side: reads requests, writes responses.
pub type ServerCodec = FrameCodec<Request, Response>;

/// Client side: reads responses, writes requests.
pub type ClientCodec = FrameCodec<Response, Request>;

/// Frames messages of type `In` on the way in and `Out` on the way out.
#[derive(Debug)]
pub struct FrameCodec<In, Out> {
    /// Body length of the frame being read, once its header is consumed.
    current_length: Option<usize>,
    max_frame_size: usize,
    _marker: PhantomData<fn(Out) -> In>,
}

impl<In, Out> FrameCodec<In, Out> {
    /// Codec with the default frame limit.
    pub fn new() -> Self {
        Self::with_max_frame_size(MAX_FRAME_SIZE)
    }

    /// Codec with a custom frame limit (clamped to [`MAX_FRAME_SIZE`]).
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            current_length: None,
            max_frame_size: max_frame_size.min(MAX_FRAME_SIZE),
            _marker: PhantomData,
        }
    }

    fn bincode(&self) -> impl Options {
        wire_options().with_limit(self.max_frame_size as u64)
    }
}

fn wire_options() -> impl Options {
    bincode::DefaultOptions::new().with_fixint_encoding()
}

/// Body length of `message` once framed, header excluded.
pub fn encoded_len<T: Serialize + ?Sized>(message: &T) -> Result<usize, WireError> {
    let size = wire_options().serialized_size(message)?;
    Ok(usize::try_from(size).unwrap_or(usize::MAX))
}

impl<In, Out> Default for FrameCodec<In, Out> {
    fn default() -> Self {
        Self::new()
    }
}

impl<In: DeserializeOwned, Out> Decoder for FrameCodec<In, Out> {
    type Item = In;
    type Error = WireError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<In>, WireError> {
        let length = match self.current_length {
            Some(length) => length,
            None => {
                if src.len() < HEADER_SIZE {
                    return Ok(None);
                }

                let mut magic = [0u8; 4];
                magic.copy_from_slice(&src[0..4]);
                if magic != NETWORK_MAGIC {
                    return Err(WireError::InvalidMagic {
                        expected: NETWORK_MAGIC,
                        actual: magic,
                    });
                }

                let mut len_bytes = [0u8; 4];
                len_bytes.copy_from_slice(&src[4..8]);
                let length = u32::from_be_bytes(len_bytes) as usize;
                if length > self.max_frame_size {
                    return Err(WireError::FrameTooLarge {
                        size: length,
                        max: self.max_frame_size,
                    });
                }

                src.advance(HEADER_SIZE);
                self.current_length = Some(length);
                length
            }
        };

        if src.len() < length {
            src.reserve(length - src.len());
            return Ok(None);
        }

        let body = src.split_to(length);
        self.current_length = None;

        let message = self.bincode().deserialize(&body)?;
        Ok(Some(message))
    }
}

impl<In, Out: Serialize> Encoder<Out> for FrameCodec<In, Out> {
    type Error = WireError;

    fn encode(&mut self, message: Out, dst: &mut BytesMut) -> Result<(), WireError> {
        let body = self.bincode().serialize(&message)?;
        let length = body.len();
        if length > self.max_frame_size {
            return Err(WireError::FrameTooLarge {
                size: length,
                max: self.max_frame_size,
            });
        }

        dst.reserve(HEADER_SIZE + length);
        dst.put_slice(&NETWORK_MAGIC);
        dst.put_u32(length as u32);
        dst.put_slice(&body);
        Ok(())
    }
}
