/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Error types for the NolFix FIXML client.
//!
//! This module provides a unified error hierarchy using `thiserror`. Every
//! failed call resolves to exactly one [`NolError`] variant:
//! - [`NolError::Transport`]: the stream failed, the connection is unusable
//! - [`NolError::Malformed`]: the response could not be decoded
//! - [`NolError::Rejected`]: the venue answered with a business message reject
//! - [`NolError::UnexpectedStatus`]: the venue answered with the wrong user status

use crate::types::{RejectReason, UserRequestType, UserStatus};
use thiserror::Error;

/// Result type alias using [`NolError`] as the error type.
pub type Result<T> = std::result::Result<T, NolError>;

/// Top-level error type for all NolFix operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NolError {
    /// Failure of the underlying byte stream.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Received bytes are not a well-formed envelope of the expected shape.
    #[error("malformed message: {0}")]
    Malformed(#[from] DecodeError),

    /// The outbound envelope could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// The venue rejected the request with a `BizMsgRej`.
    #[error("FIXML request rejected with an error: {}", reason.description())]
    Rejected {
        /// Reject reason code.
        reason: RejectReason,
        /// Diagnostic text sent with the reject.
        text: String,
    },

    /// The venue answered with a user status other than the one requested.
    #[error("user {operation} failed with status: {}", status.description())]
    UnexpectedStatus {
        /// The request that was answered.
        operation: UserRequestType,
        /// The status the venue reported.
        status: UserStatus,
    },

    /// Error in session layer operations.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

impl NolError {
    /// Returns true if the connection must not be used after this error.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns true if the venue answered at business level (reject or status).
    #[must_use]
    pub const fn is_business(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::UnexpectedStatus { .. })
    }
}

impl From<std::io::Error> for NolError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.into())
    }
}

/// Errors of the length-prefixed byte stream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The peer closed the stream before a frame was complete.
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// Frame length exceeds the configured maximum.
    #[error("frame too large: {size} bytes exceeds maximum {max_size}")]
    FrameTooLarge {
        /// Declared or actual frame size in bytes.
        size: usize,
        /// Maximum allowed size in bytes.
        max_size: usize,
    },

    /// I/O error.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => Self::ConnectionClosed,
            _ => Self::Io(err.to_string()),
        }
    }
}

/// Errors that occur while decoding a FIXML document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input contains no root element.
    #[error("missing FIXML root element")]
    MissingRoot,

    /// Root element is not `FIXML`.
    #[error("unexpected root element: {0}")]
    UnexpectedRoot(String),

    /// Child element is neither the expected payload nor a reject.
    #[error("unexpected element {found}, expected {expected}")]
    UnexpectedElement {
        /// Element name that was expected.
        expected: String,
        /// Element name that was found.
        found: String,
    },

    /// Payload element appears more than once.
    #[error("duplicate element: {0}")]
    DuplicateElement(String),

    /// Required attribute is absent.
    #[error("missing attribute {attribute} on {element}")]
    MissingAttribute {
        /// Element name.
        element: &'static str,
        /// Attribute name.
        attribute: &'static str,
    },

    /// Attribute value does not match its declared type.
    #[error("invalid value {value:?} for attribute {attribute} on {element}")]
    InvalidAttributeValue {
        /// Element name.
        element: &'static str,
        /// Attribute name.
        attribute: &'static str,
        /// Raw attribute value.
        value: String,
    },

    /// Input is not well-formed XML.
    #[error("xml error: {0}")]
    Xml(String),

    /// Envelope carries neither a payload nor a reject.
    #[error("envelope carries no {0} payload")]
    MissingPayload(String),

    /// Echoed request id differs from the one sent.
    #[error("request id mismatch: sent {sent}, received {received}")]
    RequestIdMismatch {
        /// Request id sent by the client.
        sent: i64,
        /// Request id echoed by the venue.
        received: i64,
    },
}

/// Errors that occur while encoding a FIXML document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Attribute value contains a character XML 1.0 cannot represent.
    #[error("attribute {attribute} contains invalid character {character:?}")]
    InvalidCharacter {
        /// Attribute name.
        attribute: &'static str,
        /// Offending character.
        character: char,
    },

    /// Encoded document does not fit in one frame. Nothing was sent.
    #[error("document too large: {size} bytes exceeds maximum frame size {max_size}")]
    FrameTooLarge {
        /// Encoded document size in bytes.
        size: usize,
        /// Maximum frame payload size in bytes.
        max_size: usize,
    },

    /// Writer failure.
    #[error("xml error: {0}")]
    Xml(String),
}

/// Errors in session layer operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Session is not in the correct state for the operation.
    #[error("invalid session state: expected {expected}, current {current}")]
    InvalidState {
        /// Expected state for the operation.
        expected: String,
        /// Current session state.
        current: String,
    },

    /// Session configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}
