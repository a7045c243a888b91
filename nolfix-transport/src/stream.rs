/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Blocking duplex streams.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};

/// A blocking byte stream that can be shut down in both directions.
///
/// Shutting down a stream unblocks any call waiting on it, which then fails
/// with a transport error.
pub trait SyncStream: Read + Write {
    /// Shuts down both halves of the stream.
    ///
    /// # Errors
    /// Returns the underlying I/O error.
    fn shutdown(&self) -> std::io::Result<()>;
}

impl SyncStream for TcpStream {
    fn shutdown(&self) -> std::io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}

#[cfg(unix)]
impl SyncStream for std::os::unix::net::UnixStream {
    fn shutdown(&self) -> std::io::Result<()> {
        std::os::unix::net::UnixStream::shutdown(self, Shutdown::Both)
    }
}
