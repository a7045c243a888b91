/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! # NolFix Transport
//!
//! Length-prefixed framing for the NolFix FIXML client.
//!
//! Every FIXML document travels as a 4-byte little-endian length followed by
//! the document bytes. This crate provides:
//! - **Blocking framer**: `send_frame`/`receive_frame` over any `Read + Write`
//! - **Codec**: Tokio codec for the same framing on async transports
//! - **Stream trait**: `SyncStream` for blocking streams that can be shut down

pub mod codec;
pub mod frame;
pub mod stream;

pub use codec::FixmlFrameCodec;
pub use frame::{DEFAULT_MAX_FRAME_SIZE, Framer, LENGTH_PREFIX_LEN, receive_frame, send_frame};
pub use stream::SyncStream;
