//! Sign-in, sign-up, password reset and email verification pages.

use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::types::UserEmail;
use crate::domain::user::User;
use crate::forms::auth::{ForgotPasswordForm, ResetPasswordForm, SignInForm, SignUpForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::notifier::ZmqMailer;
use crate::repository::DieselRepository;
use crate::routes::{alerts_context, redirect, render_template};
use crate::services::auth::{self as auth_service, ResetPasswordRequest, SignUpRequest};
use crate::services::ServiceError;

const GENERIC_AUTH_ERROR: &str = "An error occurred. Please try again.";
const RESET_SENT: &str =
    "If an account exists for that email, a password reset link is on its way.";

#[derive(Deserialize)]
pub struct TokenQuery {
    #[serde(default)]
    token: String,
}

/// Stores the signed session token of `user` in the identity cookie.
fn start_session(req: &HttpRequest, user: &User, config: &ServerConfig) -> Result<(), String> {
    let token = AuthenticatedUser::from(user)
        .to_jwt(&config.secret)
        .map_err(|err| err.to_string())?;
    Identity::login(&req.extensions(), token).map_err(|err| err.to_string())?;
    Ok(())
}

/// Flash text for a failed auth action.
fn auth_failure(err: ServiceError, action: &str) -> String {
    match err {
        ServiceError::Auth(err) => err.to_string(),
        ServiceError::Form(message) => message,
        err => {
            log::error!("Failed to {action}: {err}");
            GENERIC_AUTH_ERROR.to_string()
        }
    }
}

fn show_auth_page(
    template: &str,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    tera: &Tera,
) -> HttpResponse {
    if !server_config.require_auth {
        return redirect("/");
    }
    render_template(tera, template, &alerts_context(flash_messages))
}

#[get("/auth/signin")]
pub async fn show_signin(
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    show_auth_page("auth/signin.html", &flash_messages, &server_config, &tera)
}

#[post("/auth/signin")]
pub async fn signin(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<SignInForm>,
) -> impl Responder {
    match auth_service::sign_in(repo.get_ref(), &form.email, &form.password) {
        Ok(user) => match start_session(&req, &user, &server_config) {
            Ok(()) => redirect("/"),
            Err(err) => {
                log::error!("Failed to start session for {}: {err}", user.uid);
                FlashMessage::error(GENERIC_AUTH_ERROR).send();
                redirect("/auth/signin")
            }
        },
        Err(err) => {
            FlashMessage::error(auth_failure(err, "sign in")).send();
            redirect("/auth/signin")
        }
    }
}

#[get("/auth/signup")]
pub async fn show_signup(
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    show_auth_page("auth/signup.html", &flash_messages, &server_config, &tera)
}

#[post("/auth/signup")]
pub async fn signup(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    mailer: web::Data<ZmqMailer>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<SignUpForm>,
) -> impl Responder {
    let request = match SignUpRequest::try_from(form) {
        Ok(request) => request,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/auth/signup");
        }
    };

    match auth_service::sign_up(repo.get_ref(), mailer.get_ref(), &server_config, request) {
        Ok(user) => match start_session(&req, &user, &server_config) {
            Ok(()) => {
                FlashMessage::success("Account created. Check your inbox to verify your email.")
                    .send();
                redirect("/")
            }
            Err(err) => {
                log::error!("Failed to start session for {}: {err}", user.uid);
                FlashMessage::success("Account created. Please sign in.").send();
                redirect("/auth/signin")
            }
        },
        Err(err) => {
            FlashMessage::error(auth_failure(err, "sign up")).send();
            redirect("/auth/signup")
        }
    }
}

#[get("/auth/forgot")]
pub async fn show_forgot_password(
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    show_auth_page("auth/forgot.html", &flash_messages, &server_config, &tera)
}

#[post("/auth/forgot")]
pub async fn forgot_password(
    repo: web::Data<DieselRepository>,
    mailer: web::Data<ZmqMailer>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<ForgotPasswordForm>,
) -> impl Responder {
    let email = match UserEmail::try_from(form) {
        Ok(email) => email,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/auth/forgot");
        }
    };

    match auth_service::send_password_reset(
        repo.get_ref(),
        mailer.get_ref(),
        &server_config,
        &email,
    ) {
        Ok(()) => {
            FlashMessage::info(RESET_SENT).send();
            redirect("/auth/signin")
        }
        Err(err) => {
            FlashMessage::error(auth_failure(err, "send password reset")).send();
            redirect("/auth/forgot")
        }
    }
}

#[get("/auth/reset")]
pub async fn show_reset_password(
    query: web::Query<TokenQuery>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if !server_config.require_auth {
        return redirect("/");
    }
    let mut context = alerts_context(&flash_messages);
    context.insert("token", &query.token);
    render_template(&tera, "auth/reset.html", &context)
}

#[post("/auth/reset")]
pub async fn reset_password(
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<ResetPasswordForm>,
) -> impl Responder {
    // Tokens are URL-safe JWTs.
    let retry = format!("/auth/reset?token={}", form.token);

    match auth_service::reset_password(
        repo.get_ref(),
        &server_config,
        ResetPasswordRequest::from(form),
    ) {
        Ok(()) => {
            FlashMessage::success("Password updated. Please sign in.").send();
            redirect("/auth/signin")
        }
        Err(err) => {
            FlashMessage::error(auth_failure(err, "reset password")).send();
            redirect(&retry)
        }
    }
}

#[get("/auth/verify")]
pub async fn verify_email(
    req: HttpRequest,
    query: web::Query<TokenQuery>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match auth_service::verify_email(repo.get_ref(), &server_config, &query.token) {
        Ok(user) => {
            // Refresh the session so the verified flag shows up immediately.
            if let Err(err) = start_session(&req, &user, &server_config) {
                log::warn!("Failed to refresh session for {}: {err}", user.uid);
            }
            FlashMessage::success("Your email address is verified.").send();
            redirect("/")
        }
        Err(err) => {
            FlashMessage::error(auth_failure(err, "verify email")).send();
            redirect("/auth/signin")
        }
    }
}

#[post("/auth/resend-verification")]
pub async fn resend_verification(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    mailer: web::Data<ZmqMailer>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let result = user.owner_uid().map_err(ServiceError::from).and_then(|uid| {
        auth_service::resend_verification(repo.get_ref(), mailer.get_ref(), &server_config, &uid)
    });

    match result {
        Ok(()) => FlashMessage::success("Verification email sent.").send(),
        Err(err) => FlashMessage::error(auth_failure(err, "resend verification")).send(),
    }
    redirect("/settings")
}

#[post("/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect("/auth/signin")
}
