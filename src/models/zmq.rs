use serde::{Deserialize, Serialize};

/// Kind of account email requested from the emailer service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMailKind {
    PasswordReset,
    EmailVerification,
}

/// Message published on the emailer PUB socket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ZmqAuthMailMessage {
    pub kind: AuthMailKind,
    pub email: String,
    pub subject: String,
    pub body: String,
    /// Action link carrying the signed token.
    pub link: String,
}
