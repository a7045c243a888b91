/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Session state machine.
//!
//! ```text
//! connect -> Connected --login--> Authenticated --logout--> Connected
//!                any transport failure -> Failed
//!                close                 -> Closed
//! ```
//!
//! `Failed` and `Closed` are terminal: the caller must open a new session.
//! Business-level failures (rejects, unexpected statuses) and malformed
//! responses leave the state unchanged.

use nolfix_core::error::{NolError, SessionError};
use nolfix_core::types::UserRequestType;
use std::fmt;

/// Runtime state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Connected, not authenticated.
    Connected,
    /// A login succeeded and no logout has succeeded since.
    Authenticated,
    /// A transport failure left the stream unusable.
    Failed,
    /// The session was closed by the caller.
    Closed,
}

impl SessionState {
    /// Returns the state name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Authenticated => "authenticated",
            Self::Failed => "failed",
            Self::Closed => "closed",
        }
    }

    /// Returns true if requests may be sent in this state.
    #[must_use]
    pub const fn is_usable(self) -> bool {
        matches!(self, Self::Connected | Self::Authenticated)
    }

    /// Fails with `SessionError::InvalidState` unless requests may be sent.
    ///
    /// # Errors
    /// Returns `SessionError::InvalidState` for `Failed` and `Closed`.
    pub fn ensure_usable(self) -> Result<(), SessionError> {
        if self.is_usable() {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                expected: "connected or authenticated".to_string(),
                current: self.as_str().to_string(),
            })
        }
    }

    /// Returns the state after a request of the given type succeeded.
    #[must_use]
    pub const fn on_success(self, request_type: UserRequestType) -> Self {
        match request_type {
            UserRequestType::Login => Self::Authenticated,
            UserRequestType::Logout => Self::Connected,
            UserRequestType::Status | UserRequestType::Unrecognized(_) => self,
        }
    }

    /// Returns the state after a request failed with the given error.
    #[must_use]
    pub const fn on_error(self, err: &NolError) -> Self {
        if err.is_fatal() { Self::Failed } else { self }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
