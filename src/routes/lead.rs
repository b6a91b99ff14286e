//! Lead dialogs and the inline controls of the lead table.

use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::types::{ContactMethod, LeadId};
use crate::domain::view::ActiveModal;
use crate::forms::lead::{
    ContactMethodForm, ContactStatusForm, DeleteLeadForm, InterestLevelForm, LeadForm, NoteForm,
};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, close_modal, redirect, render_template, reopen_modal};
use crate::services::lead_book::Confirmation;
use crate::services::{ServiceError, lead as lead_service};

fn lead_id(raw: i32) -> Option<LeadId> {
    LeadId::new(raw).ok()
}

/// Flashes the outcome of an inline table update and returns to the table.
fn finish_update(result: Result<(), ServiceError>, action: &str) -> HttpResponse {
    match result {
        Ok(()) => {}
        Err(ServiceError::NotFound) => FlashMessage::error("Lead not found.").send(),
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(err) => {
            log::error!("Failed to {action}: {err}");
            FlashMessage::error(format!("Failed to {action}.")).send();
        }
    }
    redirect("/")
}

#[post("/lead/add")]
pub async fn add_lead(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: LeadForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Malformed lead form: {err}");
            FlashMessage::error("Failed to read the submitted lead.").send();
            return reopen_modal(&session, ActiveModal::NewLead);
        }
    };

    match lead_service::add_lead(repo.get_ref(), &user, form) {
        Ok(_) => {
            close_modal(&session);
            FlashMessage::success("Lead added.").send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            reopen_modal(&session, ActiveModal::NewLead)
        }
        Err(err) => {
            log::error!("Failed to add lead: {err}");
            FlashMessage::error("Failed to add lead.").send();
            reopen_modal(&session, ActiveModal::NewLead)
        }
    }
}

#[post("/lead/{lead_id}/save")]
pub async fn save_lead(
    lead_id_path: web::Path<i32>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let Some(id) = lead_id(lead_id_path.into_inner()) else {
        FlashMessage::error("Lead not found.").send();
        return redirect("/");
    };

    let form: LeadForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Malformed lead form: {err}");
            FlashMessage::error("Failed to read the submitted lead.").send();
            return reopen_modal(&session, ActiveModal::EditLead(id));
        }
    };

    match lead_service::save_lead(repo.get_ref(), &user, id, form) {
        Ok(()) => {
            close_modal(&session);
            FlashMessage::success("Lead updated.").send();
            redirect("/")
        }
        Err(ServiceError::NotFound) => {
            close_modal(&session);
            FlashMessage::error("Lead not found.").send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            reopen_modal(&session, ActiveModal::EditLead(id))
        }
        Err(err) => {
            log::error!("Failed to save lead {id}: {err}");
            FlashMessage::error("Failed to save lead.").send();
            reopen_modal(&session, ActiveModal::EditLead(id))
        }
    }
}

#[get("/lead/{lead_id}/delete")]
pub async fn confirm_delete_lead(
    lead_id_path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some(id) = lead_id(lead_id_path.into_inner()) else {
        FlashMessage::error("Lead not found.").send();
        return redirect("/");
    };

    match lead_service::load_lead(repo.get_ref(), &user, id) {
        Ok(lead) => {
            let mut context =
                base_context(&flash_messages, &user, "index", server_config.require_auth);
            context.insert("lead", &lead);
            render_template(&tera, "lead/delete.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Lead not found.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load lead {id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/lead/{lead_id}/delete")]
pub async fn delete_lead(
    lead_id_path: web::Path<i32>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<DeleteLeadForm>,
) -> impl Responder {
    let Some(id) = lead_id(lead_id_path.into_inner()) else {
        FlashMessage::error("Lead not found.").send();
        return redirect("/");
    };
    let confirmation = Confirmation::from_answer(form.confirm.as_deref());

    match lead_service::delete_lead(repo.get_ref(), &user, id, confirmation) {
        Ok(true) => {
            close_modal(&session);
            FlashMessage::success("Lead deleted.").send();
        }
        Ok(false) => FlashMessage::info("Lead was not deleted.").send(),
        Err(ServiceError::NotFound) => FlashMessage::error("Lead not found.").send(),
        Err(err) => {
            log::error!("Failed to delete lead {id}: {err}");
            FlashMessage::error("Failed to delete lead.").send();
        }
    }
    redirect("/")
}

#[post("/lead/{lead_id}/interest")]
pub async fn update_interest_level(
    lead_id_path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<InterestLevelForm>,
) -> impl Responder {
    let Some(id) = lead_id(lead_id_path.into_inner()) else {
        return finish_update(Err(ServiceError::NotFound), "update interest level");
    };
    let result = lead_service::set_interest_level(repo.get_ref(), &user, id, &form.interest_level);
    finish_update(result, "update interest level")
}

#[post("/lead/{lead_id}/status")]
pub async fn update_contact_status(
    lead_id_path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ContactStatusForm>,
) -> impl Responder {
    let Some(id) = lead_id(lead_id_path.into_inner()) else {
        return finish_update(Err(ServiceError::NotFound), "update contact status");
    };
    let result = lead_service::set_contact_status(repo.get_ref(), &user, id, &form.contact_status);
    finish_update(result, "update contact status")
}

#[post("/lead/{lead_id}/contact-method")]
pub async fn toggle_contact_method(
    lead_id_path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ContactMethodForm>,
) -> impl Responder {
    let Some(id) = lead_id(lead_id_path.into_inner()) else {
        return finish_update(Err(ServiceError::NotFound), "update contact methods");
    };
    let result = ContactMethod::try_from(form)
        .map_err(ServiceError::from)
        .and_then(|method| lead_service::toggle_contact_method(repo.get_ref(), &user, id, method));
    finish_update(result, "update contact methods")
}

#[post("/lead/{lead_id}/note")]
pub async fn add_note(
    lead_id_path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<NoteForm>,
) -> impl Responder {
    let Some(id) = lead_id(lead_id_path.into_inner()) else {
        return finish_update(Err(ServiceError::NotFound), "add note");
    };
    let result = lead_service::add_note(repo.get_ref(), &user, id, &form.content).map(|added| {
        if !added {
            log::debug!("Ignored blank note for lead {id}");
        }
    });
    finish_update(result, "add note")
}

#[post("/lead/{lead_id}/note/{index}/delete")]
pub async fn delete_note(
    path: web::Path<(i32, usize)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (raw_id, index) = path.into_inner();
    let Some(id) = lead_id(raw_id) else {
        return finish_update(Err(ServiceError::NotFound), "delete note");
    };
    let result = lead_service::delete_note(repo.get_ref(), &user, id, index);
    finish_update(result, "delete note")
}
