//! Mock Venue Example
//!
//! Serves the synchronous FIXML channel on `NOL_SYNC_PORT`. Accepts the
//! configured credentials, answers everything else with the statuses and
//! rejects a real gateway would send.

use nolfix::prelude::*;
use std::net::{TcpListener, TcpStream};
use std::thread;
use tracing::{info, warn};

mod common;
use common::{ExampleConfig, init_logging};

fn main() -> anyhow::Result<()> {
    init_logging();
    let cfg = ExampleConfig::from_env();
    let listener = TcpListener::bind(cfg.sync_addr())?;
    info!("Mock venue listening on {}", cfg.sync_addr());

    for stream in listener.incoming() {
        let stream = stream?;
        let cfg = cfg.clone();
        thread::spawn(move || {
            let peer = stream.peer_addr().ok();
            match serve(stream, &cfg) {
                Ok(()) | Err(NolError::Transport(TransportError::ConnectionClosed)) => {
                    info!("Client {peer:?} disconnected");
                }
                Err(err) => warn!("Client {peer:?} dropped: {err}"),
            }
        });
    }
    Ok(())
}

fn serve(mut stream: TcpStream, cfg: &ExampleConfig) -> Result<()> {
    let framer = Framer::new();
    let mut logged_in = false;
    loop {
        let frame = framer.receive_frame(&mut stream)?;
        let reply = match decode(&frame, MessageKind::UserRequest) {
            Ok(envelope) => match envelope.user_request() {
                Some(request) => answer(request, cfg, &mut logged_in),
                None => reject(RejectReason::UnknownMessageType),
            },
            Err(err) => {
                warn!("Undecodable request: {err}");
                reject(RejectReason::XmlSyntaxError)
            }
        };
        framer.send_frame(&mut stream, &encode(&reply)?)?;
    }
}

fn answer(request: &UserRequest, cfg: &ExampleConfig, logged_in: &mut bool) -> Envelope {
    let status = if request.username != cfg.username {
        UserStatus::NotExists
    } else if request.password != cfg.password {
        UserStatus::BadPassword
    } else {
        match request.request_type {
            UserRequestType::Login => {
                *logged_in = true;
                UserStatus::LoggedIn
            }
            UserRequestType::Logout => {
                *logged_in = false;
                UserStatus::LoggedOut
            }
            UserRequestType::Status if *logged_in => UserStatus::LoggedIn,
            UserRequestType::Status => UserStatus::Offline,
            UserRequestType::Unrecognized(_) => {
                return reject(RejectReason::UnknownMessageType);
            }
        }
    };
    info!("{} for {} -> {}", request.request_type, request.username, status);

    Envelope::wrap(UserResponse {
        request_id: request.request_id,
        username: request.username.clone(),
        market_depth: 1,
        status,
    })
}

fn reject(reason: RejectReason) -> Envelope {
    Envelope::wrap(BusinessMessageReject {
        reason,
        text: String::new(),
    })
}
