/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Message types for the FIXML session protocol.
//!
//! This module provides:
//! - [`Envelope`]: The `FIXML` root wrapper exchanged in both directions
//! - [`Body`]: Tagged union over the single child element of an envelope
//! - [`UserRequest`], [`UserResponse`], [`BusinessMessageReject`]: Concrete messages
//! - [`MessageKind`]: The payload shape a caller expects from a decode

use crate::types::{RejectReason, UserRequestType, UserStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Protocol version attribute (`v`) on every outbound envelope.
pub const FIXML_VERSION: &str = "5.0";

/// Revision date attribute (`r`) on every outbound envelope.
pub const FIXML_REVISION_DATE: &str = "20080317";

/// Schema date attribute (`s`) on every outbound envelope.
pub const FIXML_SCHEMA_DATE: &str = "20080314";

/// Root element name.
pub const FIXML_ROOT: &str = "FIXML";

/// Element name of a business message reject.
pub const BUSINESS_MESSAGE_REJECT: &str = "BizMsgRej";

/// Payload shapes a caller can ask the decoder for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// User request (`UserReq`).
    UserRequest,
    /// User response (`UserRsp`).
    UserResponse,
}

impl MessageKind {
    /// Returns the XML element name of this payload.
    #[must_use]
    pub const fn element_name(self) -> &'static str {
        match self {
            Self::UserRequest => "UserReq",
            Self::UserResponse => "UserRsp",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

/// Dialect attributes of the `FIXML` root element.
///
/// Reports what an inbound document declared. The encoder ignores it and
/// always writes [`FIXML_VERSION`], [`FIXML_REVISION_DATE`] and
/// [`FIXML_SCHEMA_DATE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Header {
    /// Protocol version (`v`).
    pub version: String,
    /// Revision date (`r`).
    pub revision_date: String,
    /// Schema date (`s`).
    pub schema_date: String,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            version: FIXML_VERSION.to_string(),
            revision_date: FIXML_REVISION_DATE.to_string(),
            schema_date: FIXML_SCHEMA_DATE.to_string(),
        }
    }
}

/// Login, logout, or status request sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRequest {
    /// Correlation token chosen by the client (`UserReqID`).
    pub request_id: i64,
    /// Request kind (`UserReqTyp`).
    pub request_type: UserRequestType,
    /// Username (`Username`).
    pub username: String,
    /// Password (`Password`).
    pub password: String,
}

impl UserRequest {
    /// Creates a new user request.
    ///
    /// # Arguments
    /// * `request_id` - Correlation token echoed back by the venue
    /// * `request_type` - Login, logout, or status
    /// * `username` - Account name
    /// * `password` - Account password
    #[must_use]
    pub fn new(
        request_id: i64,
        request_type: UserRequestType,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            request_id,
            request_type,
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Venue answer to a [`UserRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserResponse {
    /// Echoed correlation token (`UserReqID`).
    pub request_id: i64,
    /// Echoed identity (`Username`).
    pub username: String,
    /// Capability level granted to the session (`MktDepth`).
    pub market_depth: i64,
    /// Authentication outcome (`UserStat`).
    pub status: UserStatus,
}

/// Server-reported rejection of an inbound envelope (`BizMsgRej`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusinessMessageReject {
    /// Rejection reason (`BizRejRsn`).
    pub reason: RejectReason,
    /// Free-form diagnostic, possibly empty (`Txt`).
    pub text: String,
}

/// The single child element of an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    /// A user request payload.
    UserRequest(UserRequest),
    /// A user response payload.
    UserResponse(UserResponse),
    /// A business message reject in place of the payload.
    Reject(BusinessMessageReject),
    /// No child element.
    Empty,
}

impl Body {
    /// Returns the payload kind, or `None` for a reject or an empty body.
    #[must_use]
    pub const fn kind(&self) -> Option<MessageKind> {
        match self {
            Self::UserRequest(_) => Some(MessageKind::UserRequest),
            Self::UserResponse(_) => Some(MessageKind::UserResponse),
            Self::Reject(_) | Self::Empty => None,
        }
    }
}

impl From<UserRequest> for Body {
    fn from(msg: UserRequest) -> Self {
        Self::UserRequest(msg)
    }
}

impl From<UserResponse> for Body {
    fn from(msg: UserResponse) -> Self {
        Self::UserResponse(msg)
    }
}

impl From<BusinessMessageReject> for Body {
    fn from(msg: BusinessMessageReject) -> Self {
        Self::Reject(msg)
    }
}

/// The `FIXML` root wrapper.
///
/// Payload and reject are mutually exclusive: the body holds exactly one of
/// them, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Envelope {
    /// Root attributes.
    pub header: Header,
    /// Child element.
    pub body: Body,
}

impl Envelope {
    /// Wraps a message in an envelope carrying the default header.
    #[must_use]
    pub fn wrap(body: impl Into<Body>) -> Self {
        Self {
            header: Header::default(),
            body: body.into(),
        }
    }

    /// Creates an envelope with no child element.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            header: Header::default(),
            body: Body::Empty,
        }
    }

    /// Returns the reject, if the venue sent one.
    #[must_use]
    pub const fn reject(&self) -> Option<&BusinessMessageReject> {
        match &self.body {
            Body::Reject(reject) => Some(reject),
            _ => None,
        }
    }

    /// Returns true if the body is a reject.
    #[must_use]
    pub const fn is_reject(&self) -> bool {
        matches!(self.body, Body::Reject(_))
    }

    /// Returns the user request payload, if present.
    #[must_use]
    pub const fn user_request(&self) -> Option<&UserRequest> {
        match &self.body {
            Body::UserRequest(req) => Some(req),
            _ => None,
        }
    }

    /// Returns the user response payload, if present.
    #[must_use]
    pub const fn user_response(&self) -> Option<&UserResponse> {
        match &self.body {
            Body::UserResponse(rsp) => Some(rsp),
            _ => None,
        }
    }

    /// Returns the payload kind, or `None` for a reject or an empty body.
    #[must_use]
    pub const fn kind(&self) -> Option<MessageKind> {
        self.body.kind()
    }
}
