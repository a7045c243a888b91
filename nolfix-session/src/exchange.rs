/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! One request/response cycle.
//!
//! [`exchange`] encodes an envelope, sends it as a frame, blocks for the reply
//! frame, and decodes it against the expected payload. It performs no retries
//! and no correlation check; [`interpret_user_response`] applies the
//! business-level rules to the decoded reply. [`encode_request`] and
//! [`decode_reply`] are the halves shared with the async client.

use crate::state::SessionState;
use nolfix_core::error::{DecodeError, EncodeError, NolError, Result};
use nolfix_core::message::{Body, Envelope, MessageKind, UserRequest, UserResponse};
use nolfix_core::types::{UserRequestType, UserStatus};
use nolfix_fixml::{decode, encode};
use nolfix_transport::frame::Framer;
use std::io::{Read, Write};
use tracing::{debug, warn};

/// Sends `request` and returns the decoded reply.
///
/// Assumes no other request is outstanding on `stream`.
///
/// # Errors
/// - `NolError::Encode` if the request cannot be encoded or does not fit in a
///   frame; nothing is written in that case
/// - `NolError::Transport` if the stream fails or closes
/// - `NolError::Malformed` if the reply is not an envelope of the expected shape
pub fn exchange<S: Read + Write + ?Sized>(
    stream: &mut S,
    framer: &Framer,
    request: &Envelope,
    expected: MessageKind,
) -> Result<Envelope> {
    let bytes = encode_request(request, framer.max_frame_size())?;
    framer.send_frame(stream, &bytes)?;
    debug!(len = bytes.len(), %expected, "request sent, awaiting response");

    let response = framer.receive_frame(stream)?;
    decode_reply(&response, expected)
}

/// Encodes `request` and checks that it fits in one frame.
///
/// # Errors
/// Returns `NolError::Encode`, with `EncodeError::FrameTooLarge` when the
/// document exceeds `max_frame_size`.
pub fn encode_request(request: &Envelope, max_frame_size: usize) -> Result<Vec<u8>> {
    let bytes = encode(request)?;
    if bytes.len() > max_frame_size {
        return Err(EncodeError::FrameTooLarge {
            size: bytes.len(),
            max_size: max_frame_size,
        }
        .into());
    }
    Ok(bytes)
}

/// Decodes one reply frame.
///
/// # Errors
/// Returns `NolError::Malformed` if the frame is not an envelope of the
/// expected shape.
pub fn decode_reply(frame: &[u8], expected: MessageKind) -> Result<Envelope> {
    let envelope = decode(frame, expected)?;
    debug!(reject = envelope.is_reject(), "response decoded");
    Ok(envelope)
}

/// What a caller requires of a user response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseCheck {
    /// The request that was sent.
    pub operation: UserRequestType,
    /// The `UserReqID` that was sent.
    pub request_id: i64,
    /// Status that counts as success; `None` accepts any status.
    pub success_status: Option<UserStatus>,
    /// Whether the echoed request id must equal `request_id`.
    pub verify_request_id: bool,
}

/// Applies business-level rules to a decoded user response envelope.
///
/// # Errors
/// - `NolError::Rejected` if the venue sent a `BizMsgRej`
/// - `NolError::Malformed` if the envelope carries no user response, or the
///   echoed request id differs while verification is on
/// - `NolError::UnexpectedStatus` if the status is not the success status
pub fn interpret_user_response(envelope: Envelope, check: &ResponseCheck) -> Result<UserResponse> {
    let response = match envelope.body {
        Body::UserResponse(response) => response,
        Body::Reject(reject) => {
            warn!(
                operation = %check.operation,
                code = reject.reason.code(),
                text = %reject.text,
                "request rejected: {}",
                reject.reason.description()
            );
            return Err(NolError::Rejected {
                reason: reject.reason,
                text: reject.text,
            });
        }
        Body::UserRequest(_) | Body::Empty => {
            return Err(DecodeError::MissingPayload(
                MessageKind::UserResponse.element_name().to_string(),
            )
            .into());
        }
    };

    if check.verify_request_id && response.request_id != check.request_id {
        return Err(DecodeError::RequestIdMismatch {
            sent: check.request_id,
            received: response.request_id,
        }
        .into());
    }

    if let Some(expected) = check.success_status
        && response.status != expected
    {
        warn!(
            operation = %check.operation,
            status = response.status.code(),
            "unexpected user status: {}",
            response.status.description()
        );
        return Err(NolError::UnexpectedStatus {
            operation: check.operation,
            status: response.status,
        });
    }

    Ok(response)
}

/// A user request built by a session, awaiting its reply.
///
/// Both session clients build one per call, move the envelope over their own
/// stream, and hand the outcome back to [`PendingRequest::complete`].
#[derive(Debug)]
pub(crate) struct PendingRequest {
    request: Envelope,
    check: ResponseCheck,
}

impl PendingRequest {
    pub(crate) fn new(
        request_id: i64,
        request_type: UserRequestType,
        username: &str,
        password: &str,
        success_status: Option<UserStatus>,
        verify_request_id: bool,
    ) -> Self {
        debug!(request_id, %request_type, "sending user request");
        Self {
            request: Envelope::wrap(UserRequest::new(
                request_id,
                request_type,
                username,
                password,
            )),
            check: ResponseCheck {
                operation: request_type,
                request_id,
                success_status,
                verify_request_id,
            },
        }
    }

    pub(crate) const fn envelope(&self) -> &Envelope {
        &self.request
    }

    /// Interprets the reply and moves `state` accordingly.
    pub(crate) fn complete(
        self,
        state: &mut SessionState,
        reply: Result<Envelope>,
    ) -> Result<UserResponse> {
        let operation = self.check.operation;
        match reply.and_then(|envelope| interpret_user_response(envelope, &self.check)) {
            Ok(response) => {
                *state = state.on_success(operation);
                Ok(response)
            }
            Err(err) => {
                let next = state.on_error(&err);
                if next != *state {
                    warn!(%operation, error = %err, "session failed");
                }
                *state = next;
                Err(err)
            }
        }
    }
}
