/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Tokio codec for length-prefixed FIXML framing.
//!
//! Same wire layout as [`crate::frame`], for use with async transports.

use crate::frame::{DEFAULT_MAX_FRAME_SIZE, LENGTH_PREFIX_LEN};
use bytes::{Buf, BufMut, BytesMut};
use nolfix_core::error::TransportError;
use tokio_util::codec::{Decoder, Encoder};

/// Tokio codec for length-prefixed FIXML frames.
#[derive(Debug, Clone)]
pub struct FixmlFrameCodec {
    /// Maximum payload size in bytes.
    max_frame_size: usize,
}

impl FixmlFrameCodec {
    /// Creates a new codec with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }

    /// Sets the maximum payload size.
    #[must_use]
    pub const fn with_max_frame_size(mut self, size: usize) -> Self {
        self.max_frame_size = size;
        self
    }

    fn check_size(&self, size: usize) -> Result<u32, TransportError> {
        let too_large = TransportError::FrameTooLarge {
            size,
            max_size: self.max_frame_size,
        };
        if size > self.max_frame_size {
            return Err(too_large);
        }
        u32::try_from(size).map_err(|_| too_large)
    }
}

impl Default for FixmlFrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for FixmlFrameCodec {
    type Item = BytesMut;
    type Error = TransportError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < LENGTH_PREFIX_LEN {
            src.reserve(LENGTH_PREFIX_LEN - src.len());
            return Ok(None);
        }

        let declared = u32::from_le_bytes([src[0], src[1], src[2], src[3]]) as usize;
        self.check_size(declared)?;

        let total_length = LENGTH_PREFIX_LEN + declared;
        if src.len() < total_length {
            src.reserve(total_length - src.len());
            return Ok(None);
        }

        src.advance(LENGTH_PREFIX_LEN);
        Ok(Some(src.split_to(declared)))
    }
}

impl Encoder<&[u8]> for FixmlFrameCodec {
    type Error = TransportError;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        let len = self.check_size(item.len())?;
        dst.reserve(LENGTH_PREFIX_LEN + item.len());
        dst.put_u32_le(len);
        dst.put_slice(item);
        Ok(())
    }
}

impl Encoder<Vec<u8>> for FixmlFrameCodec {
    type Error = TransportError;

    fn encode(&mut self, item: Vec<u8>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        <Self as Encoder<&[u8]>>::encode(self, item.as_slice(), dst)
    }
}
