/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! # NolFix Session
//!
//! FIXML session client for the NolFix engine.
//!
//! This crate provides:
//! - **Exchange**: One framed request/response cycle and business-level
//!   interpretation of the reply
//! - **Session client**: Login, logout and status over a blocking stream
//! - **Async session client**: The same operations over tokio streams
//! - **State machine**: Connected/Authenticated/Failed/Closed tracking
//! - **Request ids**: Atomic `UserReqID` allocation
//! - **Configuration**: Session configuration options

pub mod async_client;
pub mod client;
pub mod config;
pub mod exchange;
pub mod request_id;
pub mod state;

pub use async_client::AsyncSession;
pub use client::Session;
pub use config::{DEFAULT_ASYNC_PORT, DEFAULT_SYNC_PORT, SessionConfig};
pub use exchange::{
    ResponseCheck, decode_reply, encode_request, exchange, interpret_user_response,
};
pub use request_id::RequestIdGenerator;
pub use state::SessionState;
