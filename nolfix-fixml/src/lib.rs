/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! # NolFix FIXML
//!
//! FIXML envelope encoding and decoding for the NolFix client.
//!
//! This crate turns [`Envelope`] values into FIXML documents and back, using
//! `quick-xml` as the event reader and writer.
//!
//! ## Features
//!
//! - **Deterministic output**: Fixed attribute order, constant dialect header
//! - **Shape-directed decoding**: The caller names the payload it expects; a
//!   `BizMsgRej` is accepted in its place
//! - **Open code tables**: Unknown status and reason codes decode as values

pub mod decoder;
pub mod encoder;

pub use decoder::{Decoder, decode};
pub use encoder::{Encoder, encode};
pub use nolfix_core::message::Envelope;
