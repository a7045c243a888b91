/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! FIXML envelope encoder.
//!
//! This module serializes an [`Envelope`] into a FIXML document. Output is
//! deterministic: the root always carries the constant `v`, `r`, and `s` dialect
//! values in that order, whatever the envelope's header says, and
//! each payload element lists its attributes in schema order. The child element
//! is always written as a start/end tag pair.

use nolfix_core::error::EncodeError;
use nolfix_core::message::{
    BUSINESS_MESSAGE_REJECT, Body, BusinessMessageReject, Envelope, FIXML_REVISION_DATE,
    FIXML_ROOT, FIXML_SCHEMA_DATE, FIXML_VERSION, MessageKind, UserRequest, UserResponse,
};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::fmt;

/// FIXML document encoder.
///
/// Writes into an owned buffer that is returned by [`Encoder::encode`].
pub struct Encoder {
    writer: Writer<Vec<u8>>,
}

impl Encoder {
    /// Creates a new encoder with a small pre-allocated buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new encoder with pre-allocated capacity.
    ///
    /// # Arguments
    /// * `capacity` - Initial buffer capacity in bytes
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            writer: Writer::new(Vec::with_capacity(capacity)),
        }
    }

    /// Encodes the envelope and returns the document bytes.
    ///
    /// # Errors
    /// Returns `EncodeError::InvalidCharacter` if a string attribute holds a
    /// character XML 1.0 cannot carry.
    pub fn encode(mut self, envelope: &Envelope) -> Result<Vec<u8>, EncodeError> {
        // Outbound documents always carry the fixed dialect.
        let mut root = BytesStart::new(FIXML_ROOT);
        root.push_attribute(("v", FIXML_VERSION));
        root.push_attribute(("r", FIXML_REVISION_DATE));
        root.push_attribute(("s", FIXML_SCHEMA_DATE));
        self.write(Event::Start(root))?;

        match &envelope.body {
            Body::UserRequest(req) => self.user_request(req)?,
            Body::UserResponse(rsp) => self.user_response(rsp)?,
            Body::Reject(reject) => self.reject(reject)?,
            Body::Empty => {}
        }

        self.write(Event::End(BytesEnd::new(FIXML_ROOT)))?;
        Ok(self.writer.into_inner())
    }

    fn user_request(&mut self, req: &UserRequest) -> Result<(), EncodeError> {
        let name = MessageKind::UserRequest.element_name();
        let mut elem = BytesStart::new(name);
        push_int(&mut elem, "UserReqID", req.request_id);
        push_int(&mut elem, "UserReqTyp", req.request_type.code());
        push_str(&mut elem, "Username", &req.username)?;
        push_str(&mut elem, "Password", &req.password)?;
        self.element(elem, name)
    }

    fn user_response(&mut self, rsp: &UserResponse) -> Result<(), EncodeError> {
        let name = MessageKind::UserResponse.element_name();
        let mut elem = BytesStart::new(name);
        push_int(&mut elem, "UserReqID", rsp.request_id);
        push_str(&mut elem, "Username", &rsp.username)?;
        push_int(&mut elem, "MktDepth", rsp.market_depth);
        push_int(&mut elem, "UserStat", rsp.status.code());
        self.element(elem, name)
    }

    fn reject(&mut self, reject: &BusinessMessageReject) -> Result<(), EncodeError> {
        let mut elem = BytesStart::new(BUSINESS_MESSAGE_REJECT);
        push_str(&mut elem, "BizRejRsn", reject.reason.code())?;
        push_str(&mut elem, "Txt", &reject.text)?;
        self.element(elem, BUSINESS_MESSAGE_REJECT)
    }

    fn element(&mut self, start: BytesStart<'_>, name: &str) -> Result<(), EncodeError> {
        self.write(Event::Start(start))?;
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), EncodeError> {
        self.writer
            .write_event(event)
            .map_err(|err| EncodeError::Xml(err.to_string()))
    }
}

impl fmt::Debug for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder")
            .field("len", &self.writer.get_ref().len())
            .finish()
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encodes an envelope with a fresh [`Encoder`].
///
/// # Errors
/// See [`Encoder::encode`].
pub fn encode(envelope: &Envelope) -> Result<Vec<u8>, EncodeError> {
    Encoder::new().encode(envelope)
}

fn push_str(
    elem: &mut BytesStart<'_>,
    name: &'static str,
    value: &str,
) -> Result<(), EncodeError> {
    if let Some(character) = value.chars().find(|&c| !is_xml_char(c)) {
        return Err(EncodeError::InvalidCharacter {
            attribute: name,
            character,
        });
    }
    elem.push_attribute((name, value));
    Ok(())
}

fn push_int(elem: &mut BytesStart<'_>, name: &'static str, value: i64) {
    let mut buf = itoa::Buffer::new();
    elem.push_attribute((name, buf.format(value)));
}

/// XML 1.0 `Char` production.
#[inline]
const fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}
