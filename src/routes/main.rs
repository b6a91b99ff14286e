use actix_multipart::form::MultipartForm;
use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::datetime::today_display;
use crate::domain::view::ActiveModal;
use crate::forms::main::UploadLeadsForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, load_view, redirect, render_template, store_view};
use crate::services::main::{IndexQuery, apply_query, load_index_page};
use crate::services::{ServiceError, lead as lead_service};

fn modal_name(modal: ActiveModal) -> &'static str {
    match modal {
        ActiveModal::None => "",
        ActiveModal::NewLead => "new-lead",
        ActiveModal::EditLead(_) => "edit-lead",
        ActiveModal::NewList => "new-list",
        ActiveModal::NewIndustry => "new-industry",
    }
}

#[get("/")]
pub async fn show_index(
    params: web::Query<IndexQuery>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut view = load_view(&session);

    let query = params.into_inner();
    if !query.is_empty() {
        apply_query(&mut view, query);
        store_view(&session, &view);
        return redirect("/");
    }

    let data = match load_index_page(repo.get_ref(), &user, &mut view) {
        Ok(data) => data,
        Err(err) => {
            log::error!("Failed to load index page: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };
    store_view(&session, &view);

    let mut context = base_context(&flash_messages, &user, "index", server_config.require_auth);
    context.insert("leads", &data.rows);
    context.insert("lists", &data.lists);
    context.insert("industries", &data.industries);
    context.insert("industry_names", &data.industry_names);
    context.insert("columns", &data.columns);
    context.insert("modal", modal_name(data.modal));
    context.insert("lead_form", &data.lead_form);
    context.insert("options", &data.options);
    context.insert("today", &data.today);

    render_template(&tera, "main/index.html", &context)
}

#[post("/leads/upload")]
pub async fn upload_leads(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(mut form): MultipartForm<UploadLeadsForm>,
) -> impl Responder {
    let rows = match form.parse(&today_display()) {
        Ok(rows) => rows,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/");
        }
    };

    match lead_service::import_leads(repo.get_ref(), &user, rows) {
        Ok(0) => FlashMessage::warning("No leads found in the uploaded file.").send(),
        Ok(count) => FlashMessage::success(format!("Imported {count} leads.")).send(),
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(err) => {
            log::error!("Failed to import leads: {err}");
            FlashMessage::error("Failed to import leads.").send();
        }
    }

    redirect("/")
}
