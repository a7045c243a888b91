/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! # NolFix Core
//!
//! Core types, code tables, and error definitions for the NolFix FIXML client.
//!
//! This crate provides the building blocks shared by all NolFix crates:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Message types**: `Envelope`, `Body`, `UserRequest`, `UserResponse`, `BusinessMessageReject`
//! - **Code tables**: `RejectReason`, `UserRequestType`, `UserStatus`
//!
//! All messages are plain value types. An envelope is built for one exchange
//! and dropped once the call returns.

pub mod error;
pub mod message;
pub mod types;

pub use error::{DecodeError, EncodeError, NolError, Result, SessionError, TransportError};
pub use message::{
    Body, BusinessMessageReject, Envelope, Header, MessageKind, UserRequest, UserResponse,
};
pub use types::{RejectReason, UserRequestType, UserStatus};
