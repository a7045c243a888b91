/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! FIXML envelope decoder.
//!
//! The decoder is told which payload it expects. The envelope may carry that
//! payload or a `BizMsgRej`; any other child of the root is an error. When a
//! reject is present the payload is never populated.

use nolfix_core::error::DecodeError;
use nolfix_core::message::{
    BUSINESS_MESSAGE_REJECT, Body, BusinessMessageReject, Envelope, FIXML_REVISION_DATE,
    FIXML_ROOT, FIXML_SCHEMA_DATE, FIXML_VERSION, Header, MessageKind, UserRequest, UserResponse,
};
use nolfix_core::types::{RejectReason, UserRequestType, UserStatus};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

const USER_REQUEST: &str = MessageKind::UserRequest.element_name();
const USER_RESPONSE: &str = MessageKind::UserResponse.element_name();

/// FIXML document decoder.
#[derive(Debug)]
pub struct Decoder<'a> {
    /// Input buffer.
    input: &'a [u8],
    /// Payload shape accepted besides a reject.
    expected: MessageKind,
}

impl<'a> Decoder<'a> {
    /// Creates a new decoder for the given input buffer.
    ///
    /// # Arguments
    /// * `input` - The FIXML document bytes
    /// * `expected` - The payload the caller expects
    #[inline]
    #[must_use]
    pub const fn new(input: &'a [u8], expected: MessageKind) -> Self {
        Self { input, expected }
    }

    /// Decodes the document into an envelope.
    ///
    /// # Errors
    /// Returns `DecodeError` if the input is not a well-formed envelope of the
    /// expected shape.
    pub fn decode(&self) -> Result<Envelope, DecodeError> {
        let mut reader = Reader::from_reader(self.input);
        let mut depth = 0usize;
        let mut header: Option<Header> = None;
        let mut payload: Option<Body> = None;
        let mut reject: Option<BusinessMessageReject> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|err| DecodeError::Xml(err.to_string()))?;

            let (elem, empty) = match event {
                Event::Start(elem) => (elem, false),
                Event::Empty(elem) => (elem, true),
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    continue;
                }
                Event::Eof => break,
                _ => continue,
            };

            match depth {
                0 => {
                    if header.is_some() {
                        return Err(DecodeError::Xml("multiple root elements".to_string()));
                    }
                    header = Some(self.root(&elem)?);
                }
                1 => {
                    if elem.name().as_ref() == BUSINESS_MESSAGE_REJECT.as_bytes() {
                        if reject.is_some() {
                            return Err(DecodeError::DuplicateElement(
                                BUSINESS_MESSAGE_REJECT.to_string(),
                            ));
                        }
                        reject = Some(decode_reject(&elem)?);
                    } else if elem.name().as_ref() == self.expected.element_name().as_bytes() {
                        if payload.is_some() {
                            return Err(DecodeError::DuplicateElement(
                                self.expected.element_name().to_string(),
                            ));
                        }
                        payload = Some(self.payload(&elem)?);
                    } else {
                        return Err(DecodeError::UnexpectedElement {
                            expected: self.expected.element_name().to_string(),
                            found: element_name(&elem),
                        });
                    }
                }
                _ => {}
            }

            if !empty {
                depth += 1;
            }
        }

        if depth != 0 {
            return Err(DecodeError::Xml("unexpected end of document".to_string()));
        }

        let header = header.ok_or(DecodeError::MissingRoot)?;
        let body = match reject {
            Some(reject) => Body::Reject(reject),
            None => payload.unwrap_or(Body::Empty),
        };

        Ok(Envelope { header, body })
    }

    fn root(&self, elem: &BytesStart<'_>) -> Result<Header, DecodeError> {
        if elem.name().as_ref() != FIXML_ROOT.as_bytes() {
            return Err(DecodeError::UnexpectedRoot(element_name(elem)));
        }
        let attrs = Attributes::collect(FIXML_ROOT, elem)?;

        Ok(Header {
            version: attrs.optional("v").unwrap_or(FIXML_VERSION).to_string(),
            revision_date: attrs.optional("r").unwrap_or(FIXML_REVISION_DATE).to_string(),
            schema_date: attrs.optional("s").unwrap_or(FIXML_SCHEMA_DATE).to_string(),
        })
    }

    fn payload(&self, elem: &BytesStart<'_>) -> Result<Body, DecodeError> {
        match self.expected {
            MessageKind::UserRequest => {
                let attrs = Attributes::collect(USER_REQUEST, elem)?;
                Ok(Body::UserRequest(UserRequest {
                    request_id: attrs.required_int("UserReqID")?,
                    request_type: UserRequestType::from(attrs.required_int("UserReqTyp")?),
                    username: attrs.required("Username")?.to_string(),
                    password: attrs.required("Password")?.to_string(),
                }))
            }
            MessageKind::UserResponse => {
                let attrs = Attributes::collect(USER_RESPONSE, elem)?;
                Ok(Body::UserResponse(UserResponse {
                    request_id: attrs.required_int("UserReqID")?,
                    username: attrs.required("Username")?.to_string(),
                    market_depth: attrs.optional_int("MktDepth")?.unwrap_or(0),
                    status: UserStatus::from(attrs.required_int("UserStat")?),
                }))
            }
        }
    }
}

/// Decodes a document expecting the given payload.
///
/// # Errors
/// See [`Decoder::decode`].
pub fn decode(input: &[u8], expected: MessageKind) -> Result<Envelope, DecodeError> {
    Decoder::new(input, expected).decode()
}

fn decode_reject(elem: &BytesStart<'_>) -> Result<BusinessMessageReject, DecodeError> {
    let attrs = Attributes::collect(BUSINESS_MESSAGE_REJECT, elem)?;
    let Ok(reason) = attrs.required("BizRejRsn")?.parse::<RejectReason>();

    Ok(BusinessMessageReject {
        reason,
        text: attrs.optional("Txt").unwrap_or_default().to_string(),
    })
}

fn element_name(elem: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(elem.name().as_ref()).into_owned()
}

/// Unescaped attributes of one element.
struct Attributes {
    element: &'static str,
    values: Vec<(Vec<u8>, String)>,
}

impl Attributes {
    fn collect(element: &'static str, elem: &BytesStart<'_>) -> Result<Self, DecodeError> {
        let mut values = Vec::new();
        for attr in elem.attributes() {
            let attr = attr.map_err(|err| DecodeError::Xml(err.to_string()))?;
            let value = attr
                .unescape_value()
                .map_err(|err| DecodeError::Xml(err.to_string()))?;
            values.push((attr.key.as_ref().to_vec(), value.into_owned()));
        }
        Ok(Self { element, values })
    }

    fn optional(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key.as_slice() == name.as_bytes())
            .map(|(_, value)| value.as_str())
    }

    fn required(&self, name: &'static str) -> Result<&str, DecodeError> {
        self.optional(name).ok_or(DecodeError::MissingAttribute {
            element: self.element,
            attribute: name,
        })
    }

    fn optional_int(&self, name: &'static str) -> Result<Option<i64>, DecodeError> {
        self.optional(name)
            .map(|value| self.parse_int(name, value))
            .transpose()
    }

    fn required_int(&self, name: &'static str) -> Result<i64, DecodeError> {
        let value = self.required(name)?;
        self.parse_int(name, value)
    }

    fn parse_int(&self, name: &'static str, value: &str) -> Result<i64, DecodeError> {
        value
            .trim()
            .parse()
            .map_err(|_| DecodeError::InvalidAttributeValue {
                element: self.element,
                attribute: name,
                value: value.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;

    const LOGIN_BOS: &str = r#"<FIXML v="5.0" r="20080317" s="20080314"><UserReq UserReqID="1" UserReqTyp="1" Username="BOS" Password="BOS"></UserReq></FIXML>"#;

    #[test]
    fn test_decode_user_request() {
        let env = decode(LOGIN_BOS.as_bytes(), MessageKind::UserRequest).unwrap();
        let req = env.user_request().unwrap();

        assert_eq!(req.request_id, 1);
        assert_eq!(req.request_type, UserRequestType::Login);
        assert_eq!(req.username, "BOS");
        assert_eq!(req.password, "BOS");
        assert_eq!(env.header, Header::default());
    }

    #[test]
    fn test_round_trip_every_request_type() {
        for request_type in [
            UserRequestType::Login,
            UserRequestType::Logout,
            UserRequestType::Status,
        ] {
            let req = UserRequest::new(17, request_type, "user<1>", "p&ss");
            let bytes = encode(&Envelope::wrap(req.clone())).unwrap();
            let env = decode(&bytes, MessageKind::UserRequest).unwrap();
            assert_eq!(env.user_request(), Some(&req));
        }
    }

    #[test]
    fn test_decode_user_response() {
        let doc = r#"<FIXML v="5.0" r="20080317" s="20080314"><UserRsp UserReqID="1" Username="BOS" MktDepth="5" UserStat="1"/></FIXML>"#;
        let env = decode(doc.as_bytes(), MessageKind::UserResponse).unwrap();
        let rsp = env.user_response().unwrap();

        assert_eq!(rsp.request_id, 1);
        assert_eq!(rsp.username, "BOS");
        assert_eq!(rsp.market_depth, 5);
        assert_eq!(rsp.status, UserStatus::LoggedIn);
    }

    #[test]
    fn test_decode_reject() {
        let doc = r#"<FIXML v="5.0" r="20080317" s="20080314"><BizMsgRej RefMsgTyp="BE" BizRejRsn="5"/></FIXML>"#;
        let env = decode(doc.as_bytes(), MessageKind::UserRequest).unwrap();
        let reject = env.reject().unwrap();

        assert_eq!(reject.reason, RejectReason::XmlSyntaxError);
        assert_eq!(reject.text, "");
        assert!(env.user_request().is_none());
    }

    #[test]
    fn test_reject_takes_precedence_over_payload() {
        let doc = r#"<FIXML v="5.0" r="20080317" s="20080314"><UserRsp UserReqID="1" Username="BOS" MktDepth="0" UserStat="1"/><BizMsgRej BizRejRsn="6" Txt="denied"/></FIXML>"#;
        let env = decode(doc.as_bytes(), MessageKind::UserResponse).unwrap();

        assert!(env.user_response().is_none());
        assert_eq!(
            env.reject().unwrap(),
            &BusinessMessageReject {
                reason: RejectReason::Unauthorized,
                text: "denied".to_string(),
            }
        );
    }

    #[test]
    fn test_reject_decodes_for_any_expected_kind() {
        let doc = r#"<FIXML v="5.0" r="20080317" s="20080314"><BizMsgRej BizRejRsn="4"/></FIXML>"#;
        for expected in [MessageKind::UserRequest, MessageKind::UserResponse] {
            let env = decode(doc.as_bytes(), expected).unwrap();
            assert!(env.is_reject());
            assert!(env.kind().is_none());
        }
    }

    #[test]
    fn test_decode_unknown_codes_are_accepted() {
        let doc = r#"<FIXML><UserRsp UserReqID="3" Username="X" MktDepth="0" UserStat="42"/></FIXML>"#;
        let env = decode(doc.as_bytes(), MessageKind::UserResponse).unwrap();
        assert_eq!(env.user_response().unwrap().status, UserStatus::Unrecognized(42));

        let doc = r#"<FIXML><BizMsgRej BizRejRsn="99"/></FIXML>"#;
        let env = decode(doc.as_bytes(), MessageKind::UserResponse).unwrap();
        assert_eq!(env.reject().unwrap().reason.description(), "Unknown error");
    }

    #[test]
    fn test_decode_missing_header_uses_defaults() {
        let env = decode(b"<FIXML/>", MessageKind::UserResponse).unwrap();
        assert_eq!(env.header, Header::default());
        assert_eq!(env.body, Body::Empty);
    }

    #[test]
    fn test_decode_unexpected_root() {
        let err = decode(b"<FIX><UserRsp/></FIX>", MessageKind::UserResponse).unwrap_err();
        assert_eq!(err, DecodeError::UnexpectedRoot("FIX".to_string()));
    }

    #[test]
    fn test_decode_empty_input() {
        let err = decode(b"", MessageKind::UserResponse).unwrap_err();
        assert_eq!(err, DecodeError::MissingRoot);
    }

    #[test]
    fn test_decode_unexpected_child() {
        let err = decode(LOGIN_BOS.as_bytes(), MessageKind::UserResponse).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnexpectedElement {
                expected: "UserRsp".to_string(),
                found: "UserReq".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_missing_attribute() {
        let doc = r#"<FIXML><UserRsp UserReqID="1" Username="BOS"/></FIXML>"#;
        let err = decode(doc.as_bytes(), MessageKind::UserResponse).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingAttribute {
                element: "UserRsp",
                attribute: "UserStat",
            }
        );
    }

    #[test]
    fn test_decode_type_mismatch() {
        let doc = r#"<FIXML><UserRsp UserReqID="one" Username="BOS" UserStat="1"/></FIXML>"#;
        let err = decode(doc.as_bytes(), MessageKind::UserResponse).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidAttributeValue {
                attribute: "UserReqID",
                ..
            }
        ));
    }

    #[test]
    fn test_decode_duplicate_payload() {
        let doc = r#"<FIXML><UserRsp UserReqID="1" Username="A" UserStat="1"/><UserRsp UserReqID="2" Username="B" UserStat="1"/></FIXML>"#;
        let err = decode(doc.as_bytes(), MessageKind::UserResponse).unwrap_err();
        assert_eq!(err, DecodeError::DuplicateElement("UserRsp".to_string()));
    }

    #[test]
    fn test_decode_truncated_document() {
        let err = decode(&LOGIN_BOS.as_bytes()[..40], MessageKind::UserRequest).unwrap_err();
        assert!(matches!(err, DecodeError::Xml(_)));
    }

    #[test]
    fn test_decode_mismatched_end_tag() {
        let doc = r#"<FIXML><UserRsp UserReqID="1" Username="A" UserStat="1"></FIXML>"#;
        let err = decode(doc.as_bytes(), MessageKind::UserResponse).unwrap_err();
        assert!(matches!(err, DecodeError::Xml(_)));
    }
}
