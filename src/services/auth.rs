//! Local email/password authentication.
//!
//! Passwords are stored as `pbkdf2-sha256$<iterations>$<salt>$<hash>` with
//! base64 encoded salt and hash. Password reset and email verification links
//! carry short-lived HS256 tokens bound to a fingerprint of the account state
//! they act on, so a reset link stops working once the password changed.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::types::{DisplayName, UserEmail, UserUid};
use crate::domain::user::{NewUser, User};
use crate::models::config::ServerConfig;
use crate::models::zmq::{AuthMailKind, ZmqAuthMailMessage};
use crate::notifier::NotifierError;
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

pub const MIN_PASSWORD_LEN: usize = 6;
const PBKDF2_ITERATIONS: u32 = 100_000;
const HASH_SCHEME: &str = "pbkdf2-sha256";
const RESET_TOKEN_TTL_MINUTES: i64 = 60;
const VERIFY_TOKEN_TTL_HOURS: i64 = 48;

/// Authentication failures; the display text is shown to the user as is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password. Please try again.")]
    InvalidCredentials,

    #[error("This email is already registered. Please try signing in instead.")]
    EmailAlreadyRegistered,

    #[error("Password is too weak. Please use at least 6 characters.")]
    WeakPassword,

    #[error("Passwords do not match")]
    PasswordsDoNotMatch,

    #[error("This link is invalid or has expired.")]
    InvalidToken,

    #[error("An error occurred. Please try again.")]
    Other(String),
}

/// Outgoing channel for account emails.
pub trait AuthMailer {
    fn send_auth_mail(&self, message: &ZmqAuthMailMessage) -> Result<(), NotifierError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TokenPurpose {
    PasswordReset,
    EmailVerification,
}

#[derive(Debug, Serialize, Deserialize)]
struct ActionClaims {
    sub: String,
    purpose: TokenPurpose,
    /// Fingerprint of the account state the token was issued against.
    fpr: String,
    exp: usize,
}

pub struct SignUpRequest {
    pub email: UserEmail,
    pub password: String,
    pub confirm_password: String,
    pub display_name: Option<DisplayName>,
}

pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

/// Derives a fresh salted hash of `password`.
pub fn hash_password(password: &str) -> String {
    let salt = *Uuid::new_v4().as_bytes();
    let key = derive_key(password, &salt, PBKDF2_ITERATIONS);
    format!(
        "{HASH_SCHEME}${PBKDF2_ITERATIONS}${}${}",
        B64.encode(salt),
        B64.encode(key)
    )
}

/// Checks `password` against a stored hash; malformed hashes never match.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if scheme != HASH_SCHEME {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (B64.decode(salt), B64.decode(hash)) else {
        return false;
    };

    let key = derive_key(password, &salt, iterations.max(1));
    constant_time_eq(&key, &expected)
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn check_new_password(password: &str, confirmation: &str) -> Result<(), AuthError> {
    if password != confirmation {
        return Err(AuthError::PasswordsDoNotMatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

fn fingerprint(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    B64.encode(&digest[..12])
}

fn issue_token(
    secret: &str,
    user: &User,
    purpose: TokenPurpose,
    ttl: Duration,
) -> Result<String, AuthError> {
    let fpr = match purpose {
        TokenPurpose::PasswordReset => fingerprint(&user.password_hash),
        TokenPurpose::EmailVerification => fingerprint(user.email.as_str()),
    };
    let claims = ActionClaims {
        sub: user.uid.as_str().to_string(),
        purpose,
        fpr,
        exp: (Utc::now() + ttl).timestamp().max(0) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| AuthError::Other(err.to_string()))
}

/// Resolves a token to its account, checking purpose and fingerprint.
fn redeem_token<R>(
    repo: &R,
    secret: &str,
    token: &str,
    purpose: TokenPurpose,
) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    let claims = decode::<ActionClaims>(
        token.trim(),
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|err| {
        log::info!("Rejected {purpose:?} token: {err}");
        AuthError::InvalidToken
    })?
    .claims;

    if claims.purpose != purpose {
        return Err(AuthError::InvalidToken.into());
    }

    let uid = UserUid::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;
    let user = repo
        .get_user_by_uid(&uid)
        .map_err(|err| {
            log::error!("Failed to load user {uid}: {err}");
            err
        })?
        .ok_or(AuthError::InvalidToken)?;

    let expected = match purpose {
        TokenPurpose::PasswordReset => fingerprint(&user.password_hash),
        TokenPurpose::EmailVerification => fingerprint(user.email.as_str()),
    };
    if expected != claims.fpr {
        return Err(AuthError::InvalidToken.into());
    }

    Ok(user)
}

fn action_link(config: &ServerConfig, path: &str, token: &str) -> String {
    format!(
        "{}{path}?token={token}",
        config.public_url.trim_end_matches('/')
    )
}

fn send_verification<M>(mailer: &M, config: &ServerConfig, user: &User) -> Result<(), AuthError>
where
    M: AuthMailer + ?Sized,
{
    let token = issue_token(
        &config.secret,
        user,
        TokenPurpose::EmailVerification,
        Duration::hours(VERIFY_TOKEN_TTL_HOURS),
    )?;
    let link = action_link(config, "/auth/verify", &token);
    let message = ZmqAuthMailMessage {
        kind: AuthMailKind::EmailVerification,
        email: user.email.as_str().to_string(),
        subject: "Verify your email address".to_string(),
        body: format!("Confirm your email address to finish setting up your account: {link}"),
        link,
    };
    mailer
        .send_auth_mail(&message)
        .map_err(|err| AuthError::Other(err.to_string()))
}

/// Registers an account and sends the verification email.
///
/// A failed verification email is logged; the account still exists.
pub fn sign_up<R, M>(
    repo: &R,
    mailer: &M,
    config: &ServerConfig,
    request: SignUpRequest,
) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
    M: AuthMailer + ?Sized,
{
    check_new_password(&request.password, &request.confirm_password)?;

    let existing = repo.get_user_by_email(&request.email).map_err(|err| {
        log::error!("Failed to look up {}: {err}", request.email);
        err
    })?;
    if existing.is_some() {
        return Err(AuthError::EmailAlreadyRegistered.into());
    }

    let new_user = NewUser::new(
        request.email,
        request.display_name,
        hash_password(&request.password),
    );
    let user = repo.create_user(&new_user).map_err(|err| {
        if err.is_unique_violation() {
            return ServiceError::from(AuthError::EmailAlreadyRegistered);
        }
        log::error!("Failed to create user {}: {err}", new_user.email);
        ServiceError::from(err)
    })?;

    log::info!("Registered user {}", user.uid);

    if let Err(err) = send_verification(mailer, config, &user) {
        log::error!("Failed to send verification email to {}: {err:?}", user.email);
    }

    Ok(user)
}

pub fn sign_in<R>(repo: &R, email: &str, password: &str) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    let email = UserEmail::new(email).map_err(|_| AuthError::InvalidCredentials)?;

    let user = repo
        .get_user_by_email(&email)
        .map_err(|err| {
            log::error!("Failed to look up {email}: {err}");
            err
        })?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials.into());
    }

    if let Err(err) = repo.record_login(&user.uid) {
        log::error!("Failed to record login of {}: {err}", user.uid);
    }

    Ok(user)
}

/// Emails a reset link when the account exists.
///
/// Unknown addresses succeed silently so the response does not reveal which
/// emails are registered.
pub fn send_password_reset<R, M>(
    repo: &R,
    mailer: &M,
    config: &ServerConfig,
    email: &UserEmail,
) -> ServiceResult<()>
where
    R: UserReader + ?Sized,
    M: AuthMailer + ?Sized,
{
    let Some(user) = repo.get_user_by_email(email).map_err(|err| {
        log::error!("Failed to look up {email}: {err}");
        err
    })?
    else {
        log::info!("Password reset requested for unknown email {email}");
        return Ok(());
    };

    let token = issue_token(
        &config.secret,
        &user,
        TokenPurpose::PasswordReset,
        Duration::minutes(RESET_TOKEN_TTL_MINUTES),
    )?;
    let link = action_link(config, "/auth/reset", &token);
    let message = ZmqAuthMailMessage {
        kind: AuthMailKind::PasswordReset,
        email: user.email.as_str().to_string(),
        subject: "Reset your password".to_string(),
        body: format!("Use this link to choose a new password: {link}"),
        link,
    };

    mailer.send_auth_mail(&message).map_err(|err| {
        log::error!("Failed to send password reset to {email}: {err}");
        AuthError::Other(err.to_string())
    })?;

    Ok(())
}

pub fn reset_password<R>(
    repo: &R,
    config: &ServerConfig,
    request: ResetPasswordRequest,
) -> ServiceResult<()>
where
    R: UserReader + UserWriter + ?Sized,
{
    check_new_password(&request.password, &request.confirm_password)?;

    let user = redeem_token(
        repo,
        &config.secret,
        &request.token,
        TokenPurpose::PasswordReset,
    )?;

    repo.update_password(&user.uid, &hash_password(&request.password))
        .map_err(|err| {
            log::error!("Failed to update password of {}: {err}", user.uid);
            err
        })?;

    log::info!("Password reset for user {}", user.uid);
    Ok(())
}

pub fn verify_email<R>(repo: &R, config: &ServerConfig, token: &str) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    let mut user = redeem_token(repo, &config.secret, token, TokenPurpose::EmailVerification)?;

    if !user.email_verified {
        repo.mark_email_verified(&user.uid).map_err(|err| {
            log::error!("Failed to verify email of {}: {err}", user.uid);
            err
        })?;
        user.email_verified = true;
    }

    Ok(user)
}

/// Sends a new verification link to a signed-in account.
pub fn resend_verification<R, M>(
    repo: &R,
    mailer: &M,
    config: &ServerConfig,
    uid: &UserUid,
) -> ServiceResult<()>
where
    R: UserReader + ?Sized,
    M: AuthMailer + ?Sized,
{
    let user = repo
        .get_user_by_uid(uid)
        .map_err(|err| {
            log::error!("Failed to load user {uid}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    if user.email_verified {
        return Ok(());
    }

    send_verification(mailer, config, &user).map_err(|err| {
        log::error!("Failed to send verification email to {}: {err:?}", user.email);
        err
    })?;
    Ok(())
}

#[cfg(test)]
mod hashing_tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let stored = hash_password("hunter22");
        assert!(stored.starts_with("pbkdf2-sha256$100000$"));
        assert!(verify_password("hunter22", &stored));
        assert!(!verify_password("hunter23", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn malformed_hashes_never_match() {
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "plain$1$AAAA$AAAA"));
        assert!(!verify_password("x", "pbkdf2-sha256$abc$AAAA$AAAA"));
        assert!(!verify_password("x", "pbkdf2-sha256$1$AAAA$AAAA$extra"));
    }

    #[test]
    fn new_password_rules() {
        assert_eq!(
            check_new_password("abc", "abd"),
            Err(AuthError::PasswordsDoNotMatch)
        );
        assert_eq!(check_new_password("abc", "abc"), Err(AuthError::WeakPassword));
        assert_eq!(check_new_password("abcdef", "abcdef"), Ok(()));
    }

    #[test]
    fn user_facing_messages() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid email or password. Please try again."
        );
        assert_eq!(
            AuthError::Other("db down".to_string()).to_string(),
            "An error occurred. Please try again."
        );
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use std::cell::RefCell;

    use chrono::NaiveDateTime;

    use super::*;
    use crate::domain::types::UserId;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    #[derive(Default)]
    struct RecordingMailer {
        sent: RefCell<Vec<ZmqAuthMailMessage>>,
    }

    impl AuthMailer for RecordingMailer {
        fn send_auth_mail(&self, message: &ZmqAuthMailMessage) -> Result<(), NotifierError> {
            self.sent.borrow_mut().push(message.clone());
            Ok(())
        }
    }

    fn config() -> ServerConfig {
        ServerConfig {
            domain: "localhost".to_string(),
            address: "127.0.0.1".to_string(),
            port: 8080,
            database_url: ":memory:".to_string(),
            templates_dir: "templates/**/*".to_string(),
            secret: "test-secret".to_string(),
            require_auth: true,
            zmq_emailer_pub: "tcp://127.0.0.1:5557".to_string(),
            public_url: "http://localhost:8080/".to_string(),
        }
    }

    fn user(password: &str) -> User {
        User {
            id: UserId::new(1).expect("id"),
            uid: UserUid::new("user-1").expect("uid"),
            email: UserEmail::new("jane@example.com").expect("email"),
            display_name: None,
            password_hash: hash_password(password),
            email_verified: false,
            created_at: NaiveDateTime::default(),
            last_login: None,
        }
    }

    fn token_from(link: &str) -> String {
        link.split("token=").nth(1).expect("token").to_string()
    }

    #[test]
    fn sign_up_rejects_registered_email() {
        let mut repo = MockRepository::new();
        let existing = user("secret1");
        repo.expect_get_user_by_email()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_create_user().times(0);
        let mailer = RecordingMailer::default();

        let result = sign_up(
            &repo,
            &mailer,
            &config(),
            SignUpRequest {
                email: UserEmail::new("jane@example.com").expect("email"),
                password: "secret1".to_string(),
                confirm_password: "secret1".to_string(),
                display_name: None,
            },
        );

        assert!(matches!(
            result,
            Err(ServiceError::Auth(AuthError::EmailAlreadyRegistered))
        ));
    }

    #[test]
    fn sign_up_checks_password_before_store() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email().times(0);
        let mailer = RecordingMailer::default();

        let result = sign_up(
            &repo,
            &mailer,
            &config(),
            SignUpRequest {
                email: UserEmail::new("jane@example.com").expect("email"),
                password: "short".to_string(),
                confirm_password: "short".to_string(),
                display_name: None,
            },
        );

        assert!(matches!(
            result,
            Err(ServiceError::Auth(AuthError::WeakPassword))
        ));
    }

    #[test]
    fn sign_up_maps_unique_violation() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email().returning(|_| Ok(None));
        repo.expect_create_user().times(1).returning(|_| {
            Err(RepositoryError::ConstraintViolation(
                "unique: UNIQUE constraint failed: users.email".to_string(),
            ))
        });
        let mailer = RecordingMailer::default();

        let result = sign_up(
            &repo,
            &mailer,
            &config(),
            SignUpRequest {
                email: UserEmail::new("jane@example.com").expect("email"),
                password: "secret1".to_string(),
                confirm_password: "secret1".to_string(),
                display_name: None,
            },
        );

        assert!(matches!(
            result,
            Err(ServiceError::Auth(AuthError::EmailAlreadyRegistered))
        ));
    }

    #[test]
    fn sign_up_sends_verification_link() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email().returning(|_| Ok(None));
        repo.expect_create_user().times(1).returning(|new_user| {
            Ok(User {
                id: UserId::new(3).expect("id"),
                uid: new_user.uid.clone(),
                email: new_user.email.clone(),
                display_name: new_user.display_name.clone(),
                password_hash: new_user.password_hash.clone(),
                email_verified: false,
                created_at: NaiveDateTime::default(),
                last_login: None,
            })
        });
        let mailer = RecordingMailer::default();

        let created = sign_up(
            &repo,
            &mailer,
            &config(),
            SignUpRequest {
                email: UserEmail::new("New@Example.com").expect("email"),
                password: "secret1".to_string(),
                confirm_password: "secret1".to_string(),
                display_name: Some(DisplayName::new("New User").expect("name")),
            },
        )
        .expect("sign up");

        assert!(verify_password("secret1", &created.password_hash));
        let sent = mailer.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, AuthMailKind::EmailVerification);
        assert_eq!(sent[0].email, "new@example.com");
        assert!(sent[0].link.starts_with("http://localhost:8080/auth/verify?token="));
    }

    #[test]
    fn sign_in_checks_password_and_records_login() {
        let mut repo = MockRepository::new();
        let stored = user("secret1");
        repo.expect_get_user_by_email()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_record_login().times(1).returning(|_| Ok(()));

        let signed_in = sign_in(&repo, " Jane@Example.com ", "secret1").expect("sign in");
        assert_eq!(signed_in.uid.as_str(), "user-1");

        assert!(matches!(
            sign_in(&repo, "jane@example.com", "wrong-pass"),
            Err(ServiceError::Auth(AuthError::InvalidCredentials))
        ));
    }

    #[test]
    fn sign_in_hides_unknown_accounts() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email().returning(|_| Ok(None));

        assert!(matches!(
            sign_in(&repo, "ghost@example.com", "secret1"),
            Err(ServiceError::Auth(AuthError::InvalidCredentials))
        ));
        assert!(matches!(
            sign_in(&repo, "not-an-email", "secret1"),
            Err(ServiceError::Auth(AuthError::InvalidCredentials))
        ));
    }

    #[test]
    fn password_reset_for_unknown_email_sends_nothing() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email().returning(|_| Ok(None));
        let mailer = RecordingMailer::default();
        let email = UserEmail::new("ghost@example.com").expect("email");

        send_password_reset(&repo, &mailer, &config(), &email).expect("uniform response");
        assert!(mailer.sent.borrow().is_empty());
    }

    #[test]
    fn reset_link_works_once() {
        let account = user("secret1");
        let mailer = RecordingMailer::default();

        let mut repo = MockRepository::new();
        let stored = account.clone();
        repo.expect_get_user_by_email()
            .returning(move |_| Ok(Some(stored.clone())));
        send_password_reset(&repo, &mailer, &config(), &account.email).expect("send");
        let token = token_from(&mailer.sent.borrow()[0].link);

        let mut repo = MockRepository::new();
        let stored = account.clone();
        repo.expect_get_user_by_uid()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_update_password()
            .times(1)
            .withf(|uid, hash| uid.as_str() == "user-1" && verify_password("secret2", hash))
            .returning(|_, _| Ok(()));
        reset_password(
            &repo,
            &config(),
            ResetPasswordRequest {
                token: token.clone(),
                password: "secret2".to_string(),
                confirm_password: "secret2".to_string(),
            },
        )
        .expect("reset");

        let mut changed = account.clone();
        changed.password_hash = hash_password("secret2");
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_uid()
            .returning(move |_| Ok(Some(changed.clone())));
        repo.expect_update_password().times(0);
        let reused = reset_password(
            &repo,
            &config(),
            ResetPasswordRequest {
                token,
                password: "secret3".to_string(),
                confirm_password: "secret3".to_string(),
            },
        );
        assert!(matches!(
            reused,
            Err(ServiceError::Auth(AuthError::InvalidToken))
        ));
    }

    #[test]
    fn verification_token_cannot_reset_password() {
        let account = user("secret1");
        let cfg = config();
        let token = issue_token(
            &cfg.secret,
            &account,
            TokenPurpose::EmailVerification,
            Duration::hours(1),
        )
        .expect("token");

        let mut repo = MockRepository::new();
        repo.expect_get_user_by_uid().times(0);
        let result = reset_password(
            &repo,
            &cfg,
            ResetPasswordRequest {
                token,
                password: "secret2".to_string(),
                confirm_password: "secret2".to_string(),
            },
        );
        assert!(matches!(
            result,
            Err(ServiceError::Auth(AuthError::InvalidToken))
        ));
    }

    #[test]
    fn verify_email_marks_account() {
        let account = user("secret1");
        let cfg = config();
        let token = issue_token(
            &cfg.secret,
            &account,
            TokenPurpose::EmailVerification,
            Duration::hours(1),
        )
        .expect("token");

        let mut repo = MockRepository::new();
        let stored = account.clone();
        repo.expect_get_user_by_uid()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_mark_email_verified()
            .times(1)
            .returning(|_| Ok(()));

        let verified = verify_email(&repo, &cfg, &token).expect("verify");
        assert!(verified.email_verified);
        assert!(matches!(
            verify_email(&repo, &cfg, "garbage"),
            Err(ServiceError::Auth(AuthError::InvalidToken))
        ));
    }
}
