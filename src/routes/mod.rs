//! HTTP handlers and the helpers shared by them.

use std::collections::HashMap;
use std::sync::LazyLock;

use actix_session::Session;
use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use regex::Regex;
use serde::Serialize;
use tera::{Context, Tera, Value};

use crate::domain::view::{ActiveModal, ViewState};
use crate::models::auth::AuthenticatedUser;

pub mod api;
pub mod auth;
pub mod lead;
pub mod list;
pub mod main;
pub mod settings;

/// Session key of the index page's [`ViewState`].
const VIEW_STATE_KEY: &str = "view";

#[derive(Serialize)]
struct Alert<'a> {
    level: &'static str,
    message: &'a str,
}

/// Maps a flash message level onto the Bootstrap alert class.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context shared by every page: flash alerts, the current user and the
/// active navigation entry.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    require_auth: bool,
) -> Context {
    let alerts: Vec<Alert> = flash_messages
        .iter()
        .map(|message| Alert {
            level: alert_level_to_str(&message.level()),
            message: message.content(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", user);
    context.insert("user_label", user.label());
    context.insert("current_page", current_page);
    context.insert("require_auth", &require_auth);
    context
}

/// Context of the signed-out auth pages.
pub fn alerts_context(flash_messages: &IncomingFlashMessages) -> Context {
    let alerts: Vec<Alert> = flash_messages
        .iter()
        .map(|message| Alert {
            level: alert_level_to_str(&message.level()),
            message: message.content(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// View state of the index page; a missing or unreadable entry starts over.
pub fn load_view(session: &Session) -> ViewState {
    match session.get::<ViewState>(VIEW_STATE_KEY) {
        Ok(view) => view.unwrap_or_default(),
        Err(err) => {
            log::warn!("Discarding unreadable view state: {err}");
            ViewState::default()
        }
    }
}

pub fn store_view(session: &Session, view: &ViewState) {
    if let Err(err) = session.insert(VIEW_STATE_KEY, view) {
        log::error!("Failed to store view state: {err}");
    }
}

/// Closes any open dialog after a successful form submission.
pub fn close_modal(session: &Session) {
    let mut view = load_view(session);
    view.modal = Default::default();
    store_view(session, &view);
}

/// Returns to the index page with `modal` still open, e.g. after a
/// rejected dialog submission.
pub fn reopen_modal(session: &Session, modal: ActiveModal) -> HttpResponse {
    let mut view = load_view(session);
    view.modal = modal;
    store_view(session, &view);
    redirect("/")
}

/// Registers the custom filters used by the templates.
pub fn register_filters(tera: &mut Tera) {
    tera.register_filter("linkify", linkify_filter);
}

fn linkify_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = tera::try_get_value!("linkify", "value", String, value);
    Ok(Value::String(linkify(&text)))
}

/// `http(s)://` and `www.` URLs, up to the next whitespace.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(https?://\S+)|(www\.\S+)").expect("URL pattern compiles")
});

/// Escapes `text` and wraps `http(s)://` and `www.` URLs in links that
/// open in a new tab. The output is safe to render unescaped.
pub fn linkify(text: &str) -> String {
    let mut html = String::with_capacity(text.len());
    let mut last = 0;

    for found in URL_RE.find_iter(text) {
        html.push_str(&ammonia::clean_text(&text[last..found.start()]));

        let url = found.as_str();
        let href = if url.starts_with("www") {
            format!("https://{url}")
        } else {
            url.to_string()
        };
        html.push_str("<a href=\"");
        html.push_str(&ammonia::clean_text(&href));
        html.push_str("\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"note-link\">");
        html.push_str(&ammonia::clean_text(url));
        html.push_str("</a>");

        last = found.end();
    }
    html.push_str(&ammonia::clean_text(&text[last..]));

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_escaped() {
        let html = linkify("<b>bold</b>");
        assert!(!html.contains('<'));
        assert!(html.contains("&lt;b&gt;bold"));
    }

    #[test]
    fn urls_become_links() {
        let html = linkify("see https://example.com now");
        assert!(html.starts_with("see"));
        assert!(html.contains("<a href=\"https:&#47;&#47;example.com\""));
        assert!(html.contains("target=\"_blank\""));
        assert!(html.contains("rel=\"noopener noreferrer\""));
        assert!(html.ends_with("now"));
    }

    #[test]
    fn www_links_get_a_scheme() {
        let html = linkify("www.citybrew.com");
        assert!(html.starts_with("<a href=\"https:&#47;&#47;www.citybrew.com\""));
        assert!(html.ends_with(">www.citybrew.com</a>"));
    }

    #[test]
    fn bare_www_is_text() {
        assert_eq!(linkify("www."), "www.");
    }

    #[test]
    fn urls_inside_punctuation_are_found() {
        let html = linkify("Menu (https://citybrew.com/menu) and site:www.citybrew.com");
        assert_eq!(html.matches("<a ").count(), 2);
        assert!(html.starts_with("Menu&#32;("));
        assert!(html.contains("href=\"https:&#47;&#47;www.citybrew.com\""));
        assert!(html.ends_with(">www.citybrew.com</a>"));
    }

    #[test]
    fn quotes_cannot_break_out_of_the_attribute() {
        let html = linkify("https://x.com/\"onmouseover=alert(1)");
        assert!(!html.contains("\"onmouseover"));
    }
}
