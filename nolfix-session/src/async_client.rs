/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Tokio session client.
//!
//! [`AsyncSession`] issues the same requests as [`crate::Session`] over an
//! async stream, framing with [`FixmlFrameCodec`]. Timeouts come from the
//! session configuration and are applied per read, write and connect.

use crate::config::SessionConfig;
use crate::exchange::{PendingRequest, decode_reply, encode_request};
use crate::request_id::RequestIdGenerator;
use crate::state::SessionState;
use bytes::BytesMut;
use nolfix_core::error::{Result, TransportError};
use nolfix_core::message::{Envelope, MessageKind, UserResponse};
use nolfix_core::types::{UserRequestType, UserStatus};
use nolfix_transport::codec::FixmlFrameCodec;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, info};

/// Initial capacity of the read buffer.
const READ_BUFFER_CAPACITY: usize = 4096;

/// A FIXML session over an async stream.
#[derive(Debug)]
pub struct AsyncSession<S = TcpStream> {
    config: SessionConfig,
    codec: FixmlFrameCodec,
    stream: S,
    read_buf: BytesMut,
    state: SessionState,
    request_ids: RequestIdGenerator,
}

impl AsyncSession<TcpStream> {
    /// Connects to the venue's synchronous channel.
    ///
    /// # Errors
    /// Returns `NolError::Session` for an invalid configuration or
    /// `NolError::Transport` if the connection cannot be established in time.
    pub async fn connect(config: SessionConfig) -> Result<Self> {
        config.validate()?;

        let addr = config.sync_addr();
        let stream = with_timeout(config.connect_timeout, TcpStream::connect(&addr)).await?;
        stream.set_nodelay(true)?;

        info!(%addr, "connected to venue");
        Self::from_stream(config, stream)
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> AsyncSession<S> {
    /// Wraps an already connected stream.
    ///
    /// # Errors
    /// Returns `NolError::Session` if the configuration is invalid.
    pub fn from_stream(config: SessionConfig, stream: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            codec: FixmlFrameCodec::new().with_max_frame_size(config.max_frame_size),
            request_ids: RequestIdGenerator::starting_at(config.initial_request_id),
            config,
            stream,
            read_buf: BytesMut::with_capacity(READ_BUFFER_CAPACITY),
            state: SessionState::Connected,
        })
    }

    /// Logs the user in.
    ///
    /// # Errors
    /// See [`crate::Session::login`].
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.request(
            UserRequestType::Login,
            username,
            password,
            Some(UserStatus::LoggedIn),
        )
        .await?;
        info!(username, "logged in");
        Ok(())
    }

    /// Logs the user out.
    ///
    /// # Errors
    /// See [`crate::Session::logout`].
    pub async fn logout(&mut self, username: &str, password: &str) -> Result<()> {
        self.request(
            UserRequestType::Logout,
            username,
            password,
            Some(UserStatus::LoggedOut),
        )
        .await?;
        info!(username, "logged out");
        Ok(())
    }

    /// Queries the user's status.
    ///
    /// # Errors
    /// See [`crate::Session::status`].
    pub async fn status(&mut self, username: &str, password: &str) -> Result<UserResponse> {
        self.request(UserRequestType::Status, username, password, None)
            .await
    }

    /// Shuts down the write half of the stream.
    ///
    /// # Errors
    /// Returns `NolError::Transport` if the shutdown fails for a reason other
    /// than the peer having already gone away.
    pub async fn close(&mut self) -> Result<()> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closed;
        match self.stream.shutdown().await {
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

    async fn request(
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
        let reply = self.exchange(pending.envelope()).await;
        pending.complete(&mut self.state, reply)
    }

    async fn exchange(&mut self, request: &Envelope) -> Result<Envelope> {
        let bytes = encode_request(request, self.config.max_frame_size)?;
        self.send_frame(&bytes).await?;
        debug!(len = bytes.len(), "request sent, awaiting response");

        let frame = self.receive_frame().await?;
        decode_reply(&frame, MessageKind::UserResponse)
    }

    async fn send_frame(&mut self, payload: &[u8]) -> std::result::Result<(), TransportError> {
        let mut frame = BytesMut::new();
        self.codec.encode(payload, &mut frame)?;

        let stream = &mut self.stream;
        with_timeout(self.config.write_timeout, async {
            stream.write_all(&frame).await?;
            stream.flush().await
        })
        .await?;
        Ok(())
    }

    async fn receive_frame(&mut self) -> std::result::Result<BytesMut, TransportError> {
        loop {
            if let Some(frame) = self.codec.decode(&mut self.read_buf)? {
                debug!(len = frame.len(), "frame received");
                return Ok(frame);
            }
            let read = with_timeout(
                self.config.read_timeout,
                self.stream.read_buf(&mut self.read_buf),
            )
            .await?;
            if read == 0 {
                return Err(TransportError::ConnectionClosed);
            }
        }
    }
}

async fn with_timeout<T, F>(limit: Option<Duration>, fut: F) -> io::Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "operation timed out"))?,
        None => fut.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nolfix_core::error::{EncodeError, NolError, SessionError};
    use nolfix_core::message::{BusinessMessageReject, UserRequest};
    use nolfix_fixml::{decode, encode};
    use nolfix_core::types::RejectReason;
    use tokio::io::{DuplexStream, duplex};
    use tokio::task::JoinHandle;

    async fn read_request(stream: &mut DuplexStream) -> Option<UserRequest> {
        let mut prefix = [0u8; 4];
        stream.read_exact(&mut prefix).await.ok()?;
        let mut payload = vec![0u8; u32::from_le_bytes(prefix) as usize];
        stream.read_exact(&mut payload).await.ok()?;
        let envelope = decode(&payload, MessageKind::UserRequest).ok()?;
        envelope.user_request().cloned()
    }

    async fn write_reply(stream: &mut DuplexStream, envelope: &Envelope) {
        let payload = encode(envelope).unwrap();
        stream
            .write_all(&(payload.len() as u32).to_le_bytes())
            .await
            .unwrap();
        stream.write_all(&payload).await.unwrap();
    }

    /// Answers every request with `reply`, until the client hangs up or
    /// `reply` returns `None`.
    fn mock_venue<F>(
        mut reply: F,
    ) -> (AsyncSession<DuplexStream>, JoinHandle<Vec<UserRequest>>)
    where
        F: FnMut(&UserRequest) -> Option<Envelope> + Send + 'static,
    {
        let (client, mut server) = duplex(8192);
        let handle = tokio::spawn(async move {
            let mut seen = Vec::new();
            while let Some(request) = read_request(&mut server).await {
                let envelope = reply(&request);
                seen.push(request);
                match envelope {
                    Some(envelope) => write_reply(&mut server, &envelope).await,
                    None => break,
                }
            }
            seen
        });
        let config = SessionConfig::default().with_read_timeout(Duration::from_secs(5));
        (AsyncSession::from_stream(config, client).unwrap(), handle)
    }

    fn respond(request: &UserRequest, status: UserStatus) -> Envelope {
        Envelope::wrap(UserResponse {
            request_id: request.request_id,
            username: request.username.clone(),
            market_depth: 1,
            status,
        })
    }

    fn well_behaved(request: &UserRequest) -> Option<Envelope> {
        let status = match request.request_type {
            UserRequestType::Logout => UserStatus::LoggedOut,
            _ => UserStatus::LoggedIn,
        };
        Some(respond(request, status))
    }

    #[tokio::test]
    async fn test_async_login_logout() {
        let (mut session, venue) = mock_venue(well_behaved);

        session.login("BOS", "BOS").await.unwrap();
        assert!(session.is_authenticated());
        session.logout("BOS", "BOS").await.unwrap();
        assert_eq!(session.state(), SessionState::Connected);
        session.close().await.unwrap();

        let seen = venue.await.unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].request_id, 1);
        assert_eq!(seen[1].request_id, 2);
        assert_eq!(seen[1].request_type, UserRequestType::Logout);
    }

    #[tokio::test]
    async fn test_async_reject() {
        let (mut session, venue) = mock_venue(|_| {
            Some(Envelope::wrap(BusinessMessageReject {
                reason: RejectReason::XmlSyntaxError,
                text: String::new(),
            }))
        });

        let err = session.login("BOS", "BOS").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "FIXML request rejected with an error: XML syntaxt error"
        );
        assert_eq!(session.state(), SessionState::Connected);
        drop(session);
        venue.await.unwrap();
    }

    #[tokio::test]
    async fn test_async_status() {
        let (mut session, venue) =
            mock_venue(|request| Some(respond(request, UserStatus::Offline)));

        let response = session.status("BOS", "BOS").await.unwrap();
        assert_eq!(response.status, UserStatus::Offline);
        drop(session);
        venue.await.unwrap();
    }

    #[tokio::test]
    async fn test_async_oversize_request_keeps_session_usable() {
        let (client, _server) = duplex(1024);
        let config = SessionConfig::default().with_max_frame_size(64);
        let mut session = AsyncSession::from_stream(config, client).unwrap();

        let err = session.login("BOS", &"x".repeat(200)).await.unwrap_err();
        assert!(matches!(
            err,
            NolError::Encode(EncodeError::FrameTooLarge { max_size: 64, .. })
        ));
        assert_eq!(session.state(), SessionState::Connected);
    }

    #[tokio::test]
    async fn test_async_venue_disconnect() {
        let (mut session, venue) = mock_venue(|_| None);

        let err = session.login("BOS", "BOS").await.unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(session.state(), SessionState::Failed);

        let err = session.login("BOS", "BOS").await.unwrap_err();
        assert!(matches!(
            err,
            NolError::Session(SessionError::InvalidState { .. })
        ));
        venue.await.unwrap();
    }

    #[tokio::test]
    async fn test_async_read_timeout() {
        let (client, _server) = duplex(1024);
        let config = SessionConfig::default().with_read_timeout(Duration::from_millis(50));
        let mut session = AsyncSession::from_stream(config, client).unwrap();

        let err = session.login("BOS", "BOS").await.unwrap_err();
        assert!(matches!(err, NolError::Transport(TransportError::Io(_))));
        assert_eq!(session.state(), SessionState::Failed);
    }
}
