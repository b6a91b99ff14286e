#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::db::establish_connection_pool;
#[cfg(feature = "server")]
use crate::middleware::RedirectUnauthorized;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::notifier::ZmqMailer;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;
#[cfg(feature = "server")]
use crate::routes::api::api_v1_leads;
#[cfg(feature = "server")]
use crate::routes::auth::{
    forgot_password, logout, resend_verification, reset_password, show_forgot_password,
    show_reset_password, show_signin, show_signup, signin, signup, verify_email,
};
#[cfg(feature = "server")]
use crate::routes::lead::{
    add_lead, add_note, confirm_delete_lead, delete_lead, delete_note, save_lead,
    toggle_contact_method, update_contact_status, update_interest_level,
};
#[cfg(feature = "server")]
use crate::routes::list::{add_industry, add_list, delete_list};
#[cfg(feature = "server")]
use crate::routes::main::{show_index, upload_leads};
#[cfg(feature = "server")]
use crate::routes::settings::show_settings;

pub mod db;
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
pub mod models;
#[cfg(feature = "server")]
pub mod notifier;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod schema;
#[cfg(feature = "server")]
pub mod services;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Publisher for password reset and verification emails.
    let mailer = web::Data::new(
        ZmqMailer::connect(&server_config.zmq_emailer_pub)
            .map_err(|e| std::io::Error::other(format!("Failed to start ZMQ mailer: {e}")))?,
    );

    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    if !server_config.require_auth {
        log::warn!("Authentication is disabled; every request runs as the demo user");
    }

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let mut tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;
    routes::register_filters(&mut tera);

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(server_config.domain.clone()))
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(show_signin)
            .service(signin)
            .service(show_signup)
            .service(signup)
            .service(show_forgot_password)
            .service(forgot_password)
            .service(show_reset_password)
            .service(reset_password)
            .service(verify_email)
            .service(logout)
            .service(web::scope("/api").service(api_v1_leads))
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_index)
                    .service(upload_leads)
                    .service(add_lead)
                    .service(save_lead)
                    .service(confirm_delete_lead)
                    .service(delete_lead)
                    .service(update_interest_level)
                    .service(update_contact_status)
                    .service(toggle_contact_method)
                    .service(add_note)
                    .service(delete_note)
                    .service(add_list)
                    .service(delete_list)
                    .service(add_industry)
                    .service(show_settings)
                    .service(resend_verification),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(mailer.clone())
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
