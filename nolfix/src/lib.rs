/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! # NolFix
//!
//! A client for the FIXML session protocol spoken by brokerage gateways over
//! length-prefixed TCP.
//!
//! NolFix logs a user in and out of a venue's synchronous channel. Each
//! request is a FIXML document framed with a 4-byte little-endian length and
//! answered with exactly one response document.
//!
//! ## Features
//!
//! - **Typed envelopes**: Requests, responses and rejects as plain Rust values
//! - **Open code tables**: Unknown status and reason codes survive decoding
//! - **Hardened framing**: Declared lengths are bounded before allocation
//! - **Sync and async**: Blocking `Session` and tokio-based `AsyncSession`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nolfix::prelude::*;
//!
//! let mut session = Session::connect(SessionConfig::new("127.0.0.1", 24444, 24445))?;
//! session.login("BOS", "BOS")?;
//! session.logout("BOS", "BOS")?;
//! session.close()?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Message model, code tables, and error definitions
//! - [`fixml`]: FIXML envelope encoding and decoding
//! - [`transport`]: Length-prefixed framing
//! - [`session`]: Exchange coordinator and session clients

pub mod core {
    //! Message model, code tables, and error definitions.
    pub use nolfix_core::*;
}

pub mod fixml {
    //! FIXML envelope encoding and decoding.
    pub use nolfix_fixml::*;
}

pub mod transport {
    //! Length-prefixed framing.
    pub use nolfix_transport::*;
}

pub mod session {
    //! Exchange coordinator and session clients.
    pub use nolfix_session::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use nolfix_core::{
        Body, BusinessMessageReject, DecodeError, EncodeError, Envelope, Header, MessageKind,
        NolError, RejectReason, Result, SessionError, TransportError, UserRequest,
        UserRequestType, UserResponse, UserStatus,
    };

    // FIXML encoding
    pub use nolfix_fixml::{decode, encode};

    // Transport
    pub use nolfix_transport::{FixmlFrameCodec, Framer, SyncStream};

    // Session
    pub use nolfix_session::{AsyncSession, Session, SessionConfig, SessionState};
}
