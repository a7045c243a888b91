/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Blocking session client.
//!
//! A [`Session`] owns one stream to the venue's synchronous channel and issues
//! user requests over it one at a time. `&mut self` on every request keeps a
//! single request in flight per connection.

use crate::config::SessionConfig;
use crate::exchange::{PendingRequest, exchange};
use crate::request_id::RequestIdGenerator;
use crate::state::SessionState;
use nolfix_core::error::Result;
use nolfix_core::message::{MessageKind, UserResponse};
use nolfix_core::types::{UserRequestType, UserStatus};
use nolfix_transport::frame::Framer;
use nolfix_transport::stream::SyncStream;
use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use tracing::info;

/// A FIXML session over a blocking stream.
#[derive(Debug)]
pub struct Session<S: SyncStream = TcpStream> {
    config: SessionConfig,
    framer: Framer,
    stream: S,
    state: SessionState,
    request_ids: RequestIdGenerator,
}

impl Session<TcpStream> {
    /// Connects to the venue's synchronous channel.
    ///
    /// Applies the configured connect, read and write timeouts and disables
    /// Nagle's algorithm.
    ///
    /// # Errors
    /// Returns `NolError::Session` for an invalid configuration or
    /// `NolError::Transport` if the connection cannot be established.
    pub fn connect(config: SessionConfig) -> Result<Self> {
        config.validate()?;

        let addr = config.sync_addr();
        let stream = match config.connect_timeout {
            Some(timeout) => connect_with_timeout(&addr, timeout)?,
            None => TcpStream::connect(&addr)?,
        };
        stream.set_nodelay(true)?;
        stream.set_read_timeout(config.read_timeout)?;
        stream.set_write_timeout(config.write_timeout)?;

        info!(%addr, "connected to venue");
        Self::from_stream(config, stream)
    }
}

impl<S: SyncStream> Session<S> {
    /// Wraps an already connected stream.
    ///
    /// # Errors
    /// Returns `NolError::Session` if the configuration is invalid.
    pub fn from_stream(config: SessionConfig, stream: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            framer: config.framer(),
            request_ids: RequestIdGenerator::starting_at(config.initial_request_id),
            config,
            stream,
            state: SessionState::Connected,
        })
    }

    /// Logs the user in.
    ///
    /// # Errors
    /// Returns `NolError::Rejected` if the venue rejects the request,
    /// `NolError::UnexpectedStatus` unless the user is reported logged in,
    /// or any transport, codec or state error.
    pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.request(
            UserRequestType::Login,
            username,
            password,
            Some(UserStatus::LoggedIn),
        )?;
        info!(username, "logged in");
        Ok(())
    }

    /// Logs the user out.
    ///
    /// # Errors
    /// Returns `NolError::Rejected` if the venue rejects the request,
    /// `NolError::UnexpectedStatus` unless the user is reported logged out,
    /// or any transport, codec or state error.
    pub fn logout(&mut self, username: &str, password: &str) -> Result<()> {
        self.request(
            UserRequestType::Logout,
            username,
            password,
            Some(UserStatus::LoggedOut),
        )?;
        info!(username, "logged out");
        Ok(())
    }

    /// Queries the user's status and returns the venue's response as is.
    ///
    /// # Errors
    /// Returns `NolError::Rejected` if the venue rejects the request, or any
    /// transport, codec or state error.
    pub fn status(&mut self, username: &str, password: &str) -> Result<UserResponse> {
        self.request(UserRequestType::Status, username, password, None)
    }

    /// Shuts the stream down. Further requests fail with `InvalidState`.
    ///
    /// # Errors
    /// Returns `NolError::Transport` if the shutdown fails for a reason other
    /// than the peer having already gone away.
    pub fn close(&mut self) -> Result<()> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closed;
        match self.stream.shutdown() {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotConnected => {}
            Err(err) => return Err(err.into()),
        }
        info!("session closed");
        Ok(())
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns true if a login succeeded and no logout has succeeded since.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated)
    }

    fn request(
        &mut self,
        request_type: UserRequestType,
        username: &str,
        password: &str,
        success_status: Option<UserStatus>,
    ) -> Result<UserResponse> {
        self.state.ensure_usable()?;

        let pending = PendingRequest::new(
            self.request_ids.allocate(),
            request_type,
            username,
            password,
            success_status,
            self.config.verify_request_id,
        );
        let reply = exchange(
            &mut self.stream,
            &self.framer,
            pending.envelope(),
            MessageKind::UserResponse,
        );
        pending.complete(&mut self.state, reply)
    }
}

fn connect_with_timeout(addr: &str, timeout: std::time::Duration) -> io::Result<TcpStream> {
    let mut last_err = None;
    for candidate in addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&candidate, timeout) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_err = Some(err),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no address resolved for {addr}"),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nolfix_core::error::{DecodeError, EncodeError, NolError, SessionError, TransportError};
    use nolfix_core::message::{BusinessMessageReject, Envelope, UserRequest};
    use nolfix_core::types::RejectReason;
    use nolfix_fixml::{decode, encode};
    use nolfix_transport::frame::{receive_frame, send_frame};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};
    use std::time::Duration;

    /// Serves one connection, answering each request with `handler`'s bytes.
    /// `None` from the handler closes the connection.
    fn mock_venue<F>(mut handler: F) -> (SessionConfig, JoinHandle<Vec<UserRequest>>)
    where
        F: FnMut(&UserRequest) -> Option<Vec<u8>> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut seen = Vec::new();
            while let Ok(frame) = receive_frame(&mut stream) {
                let envelope = decode(&frame, MessageKind::UserRequest).unwrap();
                let request = envelope.user_request().unwrap().clone();
                let reply = handler(&request);
                seen.push(request);
                match reply {
                    Some(bytes) => send_frame(&mut stream, &bytes).unwrap(),
                    None => break,
                }
            }
            seen
        });
        let config = SessionConfig::new("127.0.0.1", port, 0)
            .with_connect_timeout(Duration::from_secs(5))
            .with_read_timeout(Duration::from_secs(5));
        (config, handle)
    }

    fn user_response(request: &UserRequest, status: UserStatus) -> Vec<u8> {
        encode(&Envelope::wrap(UserResponse {
            request_id: request.request_id,
            username: request.username.clone(),
            market_depth: 1,
            status,
        }))
        .unwrap()
    }

    fn reject(reason: RejectReason) -> Vec<u8> {
        encode(&Envelope::wrap(BusinessMessageReject {
            reason,
            text: String::new(),
        }))
        .unwrap()
    }

    /// Answers login with LoggedIn and logout with LoggedOut.
    fn well_behaved(request: &UserRequest) -> Option<Vec<u8>> {
        let status = match request.request_type {
            UserRequestType::Logout => UserStatus::LoggedOut,
            _ => UserStatus::LoggedIn,
        };
        Some(user_response(request, status))
    }

    #[test]
    fn test_login_success() {
        let (config, venue) = mock_venue(well_behaved);
        let mut session = Session::connect(config).unwrap();

        session.login("BOS", "BOS").unwrap();
        assert!(session.is_authenticated());
        drop(session);

        let seen = venue.join().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].request_id, 1);
        assert_eq!(seen[0].request_type, UserRequestType::Login);
        assert_eq!(seen[0].username, "BOS");
        assert_eq!(seen[0].password, "BOS");
    }

    #[test]
    fn test_login_rejected_keeps_session_usable() {
        let mut first = true;
        let (config, venue) = mock_venue(move |request| {
            if std::mem::take(&mut first) {
                Some(reject(RejectReason::XmlSyntaxError))
            } else {
                well_behaved(request)
            }
        });
        let mut session = Session::connect(config).unwrap();

        let err = session.login("BOS", "BOS").unwrap_err();
        assert!(err.is_business());
        assert_eq!(
            err.to_string(),
            "FIXML request rejected with an error: XML syntaxt error"
        );
        assert_eq!(session.state(), SessionState::Connected);

        session.login("BOS", "BOS").unwrap();
        assert!(session.is_authenticated());
        drop(session);
        venue.join().unwrap();
    }

    #[test]
    fn test_login_then_logout() {
        let (config, venue) = mock_venue(well_behaved);
        let mut session = Session::connect(config).unwrap();

        session.login("BOS", "BOS").unwrap();
        session.logout("BOS", "BOS").unwrap();
        assert_eq!(session.state(), SessionState::Connected);
        drop(session);

        let seen = venue.join().unwrap();
        assert_eq!(seen[1].request_type, UserRequestType::Logout);
        assert_eq!(seen[1].request_id, 2);
    }

    #[test]
    fn test_logout_requires_logged_out_status() {
        let (config, venue) =
            mock_venue(|request| Some(user_response(request, UserStatus::LoggedIn)));
        let mut session = Session::connect(config).unwrap();

        session.login("BOS", "BOS").unwrap();
        let err = session.logout("BOS", "BOS").unwrap_err();
        assert_eq!(
            err,
            NolError::UnexpectedStatus {
                operation: UserRequestType::Logout,
                status: UserStatus::LoggedIn,
            }
        );
        assert_eq!(err.to_string(), "user logout failed with status: User logged in");
        assert!(session.is_authenticated());
        drop(session);
        venue.join().unwrap();
    }

    #[test]
    fn test_login_bad_password() {
        let (config, venue) =
            mock_venue(|request| Some(user_response(request, UserStatus::BadPassword)));
        let mut session = Session::connect(config).unwrap();

        let err = session.login("BOS", "wrong").unwrap_err();
        assert_eq!(err.to_string(), "user login failed with status: Bad password");
        assert_eq!(session.state(), SessionState::Connected);
        drop(session);
        venue.join().unwrap();
    }

    #[test]
    fn test_request_id_mismatch() {
        let (config, venue) = mock_venue(|request| {
            let mut echoed = request.clone();
            echoed.request_id += 100;
            Some(user_response(&echoed, UserStatus::LoggedIn))
        });
        let mut session = Session::connect(config).unwrap();

        let err = session.login("BOS", "BOS").unwrap_err();
        assert_eq!(
            err,
            NolError::Malformed(DecodeError::RequestIdMismatch {
                sent: 1,
                received: 101,
            })
        );
        assert_eq!(session.state(), SessionState::Connected);
        drop(session);
        venue.join().unwrap();
    }

    #[test]
    fn test_request_id_mismatch_ignored_when_disabled() {
        let (config, venue) = mock_venue(|request| {
            let mut echoed = request.clone();
            echoed.request_id = 0;
            Some(user_response(&echoed, UserStatus::LoggedIn))
        });
        let mut session =
            Session::connect(config.with_request_id_verification(false)).unwrap();

        session.login("BOS", "BOS").unwrap();
        assert!(session.is_authenticated());
        drop(session);
        venue.join().unwrap();
    }

    #[test]
    fn test_venue_disconnect_fails_session() {
        let (config, venue) = mock_venue(|_| None);
        let mut session = Session::connect(config).unwrap();

        let err = session.login("BOS", "BOS").unwrap_err();
        assert_eq!(err, NolError::Transport(TransportError::ConnectionClosed));
        assert!(err.is_fatal());
        assert_eq!(session.state(), SessionState::Failed);

        let err = session.login("BOS", "BOS").unwrap_err();
        assert!(matches!(
            err,
            NolError::Session(SessionError::InvalidState { .. })
        ));
        venue.join().unwrap();
    }

    #[test]
    fn test_oversize_request_keeps_session_usable() {
        let (config, venue) = mock_venue(well_behaved);
        let mut session = Session::connect(config.with_max_frame_size(256)).unwrap();

        let err = session.login("BOS", &"x".repeat(300)).unwrap_err();
        assert!(matches!(
            err,
            NolError::Encode(EncodeError::FrameTooLarge { max_size: 256, .. })
        ));
        assert!(!err.is_fatal());
        assert_eq!(session.state(), SessionState::Connected);

        session.login("BOS", "BOS").unwrap();
        assert!(session.is_authenticated());
        drop(session);

        let seen = venue.join().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].request_id, 2);
    }

    #[test]
    fn test_close() {
        let (config, venue) = mock_venue(well_behaved);
        let mut session = Session::connect(config).unwrap();

        session.close().unwrap();
        assert_eq!(session.state(), SessionState::Closed);
        session.close().unwrap();

        let err = session.logout("BOS", "BOS").unwrap_err();
        assert_eq!(
            err,
            NolError::Session(SessionError::InvalidState {
                expected: "connected or authenticated".to_string(),
                current: "closed".to_string(),
            })
        );
        assert!(venue.join().unwrap().is_empty());
    }

    #[test]
    fn test_status_returns_response() {
        let (config, venue) = mock_venue(|request| {
            Some(
                encode(&Envelope::wrap(UserResponse {
                    request_id: request.request_id,
                    username: request.username.clone(),
                    market_depth: 5,
                    status: UserStatus::VenueOffline,
                }))
                .unwrap(),
            )
        });
        let mut session = Session::connect(config).unwrap();

        let response = session.status("BOS", "BOS").unwrap();
        assert_eq!(response.market_depth, 5);
        assert_eq!(response.status, UserStatus::VenueOffline);
        assert_eq!(session.state(), SessionState::Connected);
        drop(session);
        venue.join().unwrap();
    }

    #[test]
    fn test_request_ids_increment_from_configured_start() {
        let (config, venue) = mock_venue(well_behaved);
        let mut session = Session::connect(config.with_initial_request_id(40)).unwrap();

        session.login("BOS", "BOS").unwrap();
        session.status("BOS", "BOS").unwrap();
        session.logout("BOS", "BOS").unwrap();
        drop(session);

        let ids: Vec<i64> = venue
            .join()
            .unwrap()
            .iter()
            .map(|request| request.request_id)
            .collect();
        assert_eq!(ids, vec![40, 41, 42]);
    }

    #[test]
    fn test_garbage_response_is_malformed_not_fatal() {
        let mut first = true;
        let (config, venue) = mock_venue(move |request| {
            if std::mem::take(&mut first) {
                Some(b"<FIXML><UserRsp".to_vec())
            } else {
                well_behaved(request)
            }
        });
        let mut session = Session::connect(config).unwrap();

        let err = session.login("BOS", "BOS").unwrap_err();
        assert!(matches!(err, NolError::Malformed(_)));
        assert_eq!(session.state(), SessionState::Connected);

        session.login("BOS", "BOS").unwrap();
        drop(session);
        venue.join().unwrap();
    }

    #[test]
    fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = Session::connect(SessionConfig::new("127.0.0.1", port, 0)).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_connect_invalid_config() {
        let err = Session::connect(SessionConfig::new("", 24444, 24445)).unwrap_err();
        assert!(matches!(
            err,
            NolError::Session(SessionError::Configuration(_))
        ));
    }
}
