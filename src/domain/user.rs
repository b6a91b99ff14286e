use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{DisplayName, UserEmail, UserId, UserUid};

/// Uid of the synthetic identity used when authentication is disabled.
pub const GUEST_UID: &str = "demo-user";
pub const GUEST_EMAIL: &str = "demo@example.com";
pub const GUEST_DISPLAY_NAME: &str = "Demo User";

/// Registered account.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub uid: UserUid,
    pub email: UserEmail,
    pub display_name: Option<DisplayName>,
    /// Never serialized to templates or the API.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email_verified: bool,
    pub created_at: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
}

/// Payload for registering a new account.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub uid: UserUid,
    pub email: UserEmail,
    pub display_name: Option<DisplayName>,
    pub password_hash: String,
}

impl NewUser {
    #[must_use]
    pub fn new(email: UserEmail, display_name: Option<DisplayName>, password_hash: String) -> Self {
        Self {
            uid: UserUid::generate(),
            email,
            display_name,
            password_hash,
        }
    }
}
