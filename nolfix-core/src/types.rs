/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Code tables for FIXML session messages.
//!
//! This module provides the enumerated codes carried as attributes on the wire:
//! - [`RejectReason`]: `BizRejRsn` on a business message reject
//! - [`UserRequestType`]: `UserReqTyp` on a user request
//! - [`UserStatus`]: `UserStat` on a user response
//!
//! Codes are open-ended. A value outside the known table is kept as an
//! `Unrecognized` variant carrying the raw code, and its description falls back
//! to a generic string.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason a venue rejected an inbound envelope (`BizRejRsn`).
///
/// The code is a numeric string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    /// Other error (0).
    Other,
    /// Unknown ID (1).
    UnknownId,
    /// Unknown instrument (2).
    UnknownInstrument,
    /// Unknown message type (3).
    UnknownMessageType,
    /// No access (4).
    NoAccess,
    /// XML syntax error (5).
    XmlSyntaxError,
    /// Unauthorized (6).
    Unauthorized,
    /// Not connected (7).
    NotConnected,
    /// Code outside the known table.
    Unrecognized(String),
}

impl RejectReason {
    /// Returns the wire code of this reason.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Other => "0",
            Self::UnknownId => "1",
            Self::UnknownInstrument => "2",
            Self::UnknownMessageType => "3",
            Self::NoAccess => "4",
            Self::XmlSyntaxError => "5",
            Self::Unauthorized => "6",
            Self::NotConnected => "7",
            Self::Unrecognized(code) => code,
        }
    }

    /// Returns the human-readable description used by the venue documentation.
    ///
    /// The text for code 5 keeps the venue's original spelling.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Other => "Other error",
            Self::UnknownId => "Unknown ID",
            Self::UnknownInstrument => "Unknown instrument",
            Self::UnknownMessageType => "Unknown message type",
            Self::NoAccess => "No access",
            Self::XmlSyntaxError => "XML syntaxt error",
            Self::Unauthorized => "Unauthorized",
            Self::NotConnected => "Not connected",
            Self::Unrecognized(_) => "Unknown error",
        }
    }

    /// Returns true if the code is not part of the known table.
    #[must_use]
    pub const fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized(_))
    }
}

impl std::str::FromStr for RejectReason {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "0" => Self::Other,
            "1" => Self::UnknownId,
            "2" => Self::UnknownInstrument,
            "3" => Self::UnknownMessageType,
            "4" => Self::NoAccess,
            "5" => Self::XmlSyntaxError,
            "6" => Self::Unauthorized,
            "7" => Self::NotConnected,
            other => Self::Unrecognized(other.to_string()),
        })
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Kind of user request (`UserReqTyp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRequestType {
    /// Log the user in (1).
    Login,
    /// Log the user out (2).
    Logout,
    /// Query the user status (4).
    Status,
    /// Code outside the known table.
    Unrecognized(i64),
}

impl UserRequestType {
    /// Returns the wire code of this request type.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Login => 1,
            Self::Logout => 2,
            Self::Status => 4,
            Self::Unrecognized(code) => code,
        }
    }

    /// Returns a short name for logs and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::Status => "status",
            Self::Unrecognized(_) => "unknown request",
        }
    }
}

impl From<i64> for UserRequestType {
    fn from(code: i64) -> Self {
        match code {
            1 => Self::Login,
            2 => Self::Logout,
            4 => Self::Status,
            other => Self::Unrecognized(other),
        }
    }
}

impl fmt::Display for UserRequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Authentication outcome reported by the venue (`UserStat`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserStatus {
    /// User logged in (1).
    LoggedIn,
    /// User logged out (2).
    LoggedOut,
    /// User does not exist (3).
    NotExists,
    /// Bad password (4).
    BadPassword,
    /// User offline (5).
    Offline,
    /// Other (6).
    Other,
    /// Venue offline (7).
    VenueOffline,
    /// Code outside the known table.
    Unrecognized(i64),
}

impl UserStatus {
    /// Returns the wire code of this status.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::LoggedIn => 1,
            Self::LoggedOut => 2,
            Self::NotExists => 3,
            Self::BadPassword => 4,
            Self::Offline => 5,
            Self::Other => 6,
            Self::VenueOffline => 7,
            Self::Unrecognized(code) => code,
        }
    }

    /// Returns the human-readable description used by the venue documentation.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::LoggedIn => "User logged in",
            Self::LoggedOut => "User loggged out",
            Self::NotExists => "User does not exist",
            Self::BadPassword => "Bad password",
            Self::Offline => "User offline",
            Self::Other => "Other",
            Self::VenueOffline => "NOL Offline",
            Self::Unrecognized(_) => "Unknown user status",
        }
    }
}

impl From<i64> for UserStatus {
    fn from(code: i64) -> Self {
        match code {
            1 => Self::LoggedIn,
            2 => Self::LoggedOut,
            3 => Self::NotExists,
            4 => Self::BadPassword,
            5 => Self::Offline,
            6 => Self::Other,
            7 => Self::VenueOffline,
            other => Self::Unrecognized(other),
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
