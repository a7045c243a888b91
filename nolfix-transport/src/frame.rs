/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Blocking length-prefixed framing.
//!
//! A frame is a 4-byte unsigned little-endian payload length followed by the
//! payload. There are no acknowledgements, sequence numbers, or checksums.
//! A declared length above the configured maximum is refused before any buffer
//! is allocated.

use bytes::{BufMut, BytesMut};
use nolfix_core::error::TransportError;
use std::io::{Read, Write};
use tracing::debug;

/// Size of the length prefix in bytes.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Default maximum payload size (1 MiB).
pub const DEFAULT_MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Length-prefixed framer for blocking streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framer {
    /// Maximum payload size in bytes.
    max_frame_size: usize,
}

impl Framer {
    /// Creates a framer with the default maximum frame size.
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

    /// Returns the maximum payload size.
    #[must_use]
    pub const fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    /// Writes one frame and flushes the stream.
    ///
    /// Keeps writing until every byte of the prefix and payload is accepted.
    ///
    /// # Errors
    /// Returns `TransportError::FrameTooLarge` if the payload exceeds the
    /// maximum (nothing is written in that case), or the stream's error.
    pub fn send_frame<W: Write + ?Sized>(
        &self,
        stream: &mut W,
        payload: &[u8],
    ) -> Result<(), TransportError> {
        let len = self.check_size(payload.len())?;

        let mut frame = BytesMut::with_capacity(LENGTH_PREFIX_LEN + payload.len());
        frame.put_u32_le(len);
        frame.put_slice(payload);

        stream.write_all(&frame)?;
        stream.flush()?;
        debug!(len = payload.len(), "frame sent");
        Ok(())
    }

    /// Reads one complete frame and returns its payload.
    ///
    /// # Errors
    /// Returns `TransportError::ConnectionClosed` if the stream ends before the
    /// frame is complete, `TransportError::FrameTooLarge` if the declared length
    /// exceeds the maximum, or the stream's error.
    pub fn receive_frame<R: Read + ?Sized>(
        &self,
        stream: &mut R,
    ) -> Result<Vec<u8>, TransportError> {
        let mut prefix = [0u8; LENGTH_PREFIX_LEN];
        stream.read_exact(&mut prefix)?;

        let declared = u32::from_le_bytes(prefix) as usize;
        self.check_size(declared)?;

        let mut payload = vec![0u8; declared];
        stream.read_exact(&mut payload)?;
        debug!(len = declared, "frame received");
        Ok(payload)
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

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes one frame with the default framer.
///
/// # Errors
/// See [`Framer::send_frame`].
pub fn send_frame<W: Write + ?Sized>(
    stream: &mut W,
    payload: &[u8],
) -> Result<(), TransportError> {
    Framer::new().send_frame(stream, payload)
}

/// Reads one frame with the default framer.
///
/// # Errors
/// See [`Framer::receive_frame`].
pub fn receive_frame<R: Read + ?Sized>(stream: &mut R) -> Result<Vec<u8>, TransportError> {
    Framer::new().receive_frame(stream)
}
