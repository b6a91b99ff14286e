//! Session identity of the current request.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::types::{TypeConstraintError, UserUid};
use crate::domain::user::{GUEST_DISPLAY_NAME, GUEST_EMAIL, GUEST_UID, User};
use crate::models::config::ServerConfig;

/// Lifetime of a session token.
pub const SESSION_TTL_DAYS: i64 = 7;

/// Claims stored in the identity cookie as an HS256 JWT.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub email_verified: bool,
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Identity substituted for every request when auth is disabled.
    pub fn guest() -> Self {
        let mut user = Self {
            uid: GUEST_UID.to_string(),
            email: GUEST_EMAIL.to_string(),
            display_name: Some(GUEST_DISPLAY_NAME.to_string()),
            email_verified: true,
            exp: 0,
        };
        user.set_expiration(SESSION_TTL_DAYS);
        user
    }

    pub fn set_expiration(&mut self, days: i64) {
        let expiration = Utc::now() + Duration::days(days);
        self.exp = expiration.timestamp().max(0) as usize;
    }

    /// Owner key of the user's leads and lists.
    pub fn owner_uid(&self) -> Result<UserUid, TypeConstraintError> {
        UserUid::new(self.uid.as_str())
    }

    /// Name shown in the header: the display name, else the email.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(self.email.as_str())
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        let mut claims = Self {
            uid: user.uid.as_str().to_string(),
            email: user.email.as_str().to_string(),
            display_name: user.display_name.as_ref().map(|name| name.as_str().to_string()),
            email_verified: user.email_verified,
            exp: 0,
        };
        claims.set_expiration(SESSION_TTL_DAYS);
        claims
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
        log::error!("ServerConfig is not registered as app data");
        return Err(actix_web::error::ErrorInternalServerError(
            "server misconfigured",
        ));
    };

    if !config.require_auth {
        return Ok(AuthenticatedUser::guest());
    }

    let identity = req
        .get_identity()
        .map_err(|_| actix_web::error::ErrorUnauthorized("not signed in"))?;
    let token = identity
        .id()
        .map_err(|_| actix_web::error::ErrorUnauthorized("not signed in"))?;

    AuthenticatedUser::from_jwt(&token, &config.secret).map_err(|err| {
        log::info!("Rejected session token: {err}");
        actix_web::error::ErrorUnauthorized("session expired")
    })
}
