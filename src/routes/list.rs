//! Sidebar actions: saved lists and industries.

use actix_session::Session;
use actix_web::{Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::domain::types::SavedListId;
use crate::domain::view::ActiveModal;
use crate::forms::list::{AddIndustryForm, AddListForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{close_modal, load_view, redirect, reopen_modal, store_view};
use crate::services::{ServiceError, lead as lead_service, list as list_service};

#[post("/list/add")]
pub async fn add_list(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: AddListForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Malformed list form: {err}");
            FlashMessage::error("Failed to read the submitted list.").send();
            return reopen_modal(&session, ActiveModal::NewList);
        }
    };

    match list_service::add_list(repo.get_ref(), &user, form) {
        Ok(_) => {
            close_modal(&session);
            FlashMessage::success("List created.").send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            reopen_modal(&session, ActiveModal::NewList)
        }
        Err(err) => {
            log::error!("Failed to create list: {err}");
            FlashMessage::error("Failed to create list.").send();
            reopen_modal(&session, ActiveModal::NewList)
        }
    }
}

#[post("/list/{list_id}/delete")]
pub async fn delete_list(
    list_id: web::Path<i32>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let Ok(id) = SavedListId::new(list_id.into_inner()) else {
        FlashMessage::error("List not found.").send();
        return redirect("/");
    };

    let mut view = load_view(&session);
    match list_service::delete_list(repo.get_ref(), &user, id, &mut view) {
        Ok(()) => {
            store_view(&session, &view);
            FlashMessage::success("List deleted.").send();
        }
        Err(ServiceError::NotFound) => FlashMessage::error("List not found.").send(),
        Err(err) => {
            log::error!("Failed to delete list {id}: {err}");
            FlashMessage::error("Failed to delete list.").send();
        }
    }
    redirect("/")
}

#[post("/industry/add")]
pub async fn add_industry(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddIndustryForm>,
) -> impl Responder {
    match lead_service::add_industry(repo.get_ref(), &user, &form.industry) {
        Ok(true) => {
            close_modal(&session);
            FlashMessage::success(format!("Industry \"{}\" added.", form.industry.trim())).send();
            redirect("/")
        }
        Ok(false) => {
            FlashMessage::warning("That industry is blank or already exists.").send();
            reopen_modal(&session, ActiveModal::NewIndustry)
        }
        Err(err) => {
            log::error!("Failed to add industry: {err}");
            FlashMessage::error("Failed to add industry.").send();
            reopen_modal(&session, ActiveModal::NewIndustry)
        }
    }
}
