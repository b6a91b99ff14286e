//! ZeroMQ publisher for outgoing account emails.

use std::sync::Mutex;

use thiserror::Error;

use crate::models::zmq::ZmqAuthMailMessage;
use crate::services::auth::AuthMailer;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("zmq error: {0}")]
    Zmq(#[from] zmq::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("publisher lock poisoned")]
    Poisoned,
}

/// PUB socket bound to the emailer endpoint; messages are JSON frames.
pub struct ZmqMailer {
    socket: Mutex<zmq::Socket>,
    // Sockets must not outlive their context.
    _context: zmq::Context,
}

impl ZmqMailer {
    pub fn connect(endpoint: &str) -> Result<Self, NotifierError> {
        let context = zmq::Context::new();
        let socket = context.socket(zmq::PUB)?;
        socket.connect(endpoint)?;
        log::info!("Publishing auth mail to {endpoint}");

        Ok(Self {
            socket: Mutex::new(socket),
            _context: context,
        })
    }
}

impl AuthMailer for ZmqMailer {
    fn send_auth_mail(&self, message: &ZmqAuthMailMessage) -> Result<(), NotifierError> {
        let payload = serde_json::to_vec(message)?;
        let socket = self.socket.lock().map_err(|_| NotifierError::Poisoned)?;
        socket.send(payload, 0)?;
        log::info!("Queued {:?} email for {}", message.kind, message.email);
        Ok(())
    }
}
