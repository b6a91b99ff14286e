//! Lead editing workflows behind the table controls and lead dialogs.

use validator::Validate;

use crate::domain::datetime::{now_timestamp, today_display};
use crate::domain::types::{ContactMethod, ContactStatus, InterestLevel, LeadId};
use crate::dto::main::LeadRow;
use crate::forms::FormError;
use crate::forms::lead::{LeadForm, LeadPayload};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{LeadReader, LeadWriter, SavedListReader, SavedListWriter};
use crate::services::ServiceResult;
use crate::services::lead_book::{Confirmation, LeadBook};

/// Opens the current user's lead book.
pub(crate) fn open_book<'r, R>(
    repo: &'r R,
    user: &AuthenticatedUser,
) -> ServiceResult<LeadBook<'r, R>>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    let owner = user.owner_uid()?;
    LeadBook::load(repo, owner)
}

fn checked_payload(form: LeadForm) -> ServiceResult<LeadPayload> {
    form.validate().map_err(|err| {
        log::info!("Rejected lead form: {err}");
        FormError::from(err)
    })?;
    Ok(LeadPayload::try_from(form)?)
}

/// Creates a lead from the "Add New Lead" dialog.
pub fn add_lead<R>(repo: &R, user: &AuthenticatedUser, form: LeadForm) -> ServiceResult<LeadId>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    let payload = checked_payload(form)?;
    let mut book = open_book(repo, user)?;

    let details = payload.into_details(today_display(), Vec::new(), now_timestamp());
    let id = book.add_lead(details)?;

    log::info!("Added lead {id} for {}", book.owner());
    Ok(id)
}

/// Saves the edit dialog; a rejected date keeps the stored one.
pub fn save_lead<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: LeadId,
    form: LeadForm,
) -> ServiceResult<()>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    let payload = checked_payload(form)?;
    let mut book = open_book(repo, user)?;

    let lead = book.lead(id)?;
    let details = payload.into_details(
        lead.last_contact_date.clone(),
        lead.notes.clone(),
        now_timestamp(),
    );
    book.edit_lead(id, details)
}

/// Lead shown on the delete confirmation page.
pub fn load_lead<R>(repo: &R, user: &AuthenticatedUser, id: LeadId) -> ServiceResult<LeadRow>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    let book = open_book(repo, user)?;
    Ok(LeadRow::from(book.lead(id)?))
}

/// Returns whether the lead was deleted.
pub fn delete_lead<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: LeadId,
    confirmation: Confirmation,
) -> ServiceResult<bool>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    let mut book = open_book(repo, user)?;
    book.delete_lead(id, confirmation)
}

pub fn set_interest_level<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: LeadId,
    level: &str,
) -> ServiceResult<()>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    let mut book = open_book(repo, user)?;
    book.update_interest_level(id, InterestLevel::from(level.trim()))
}

pub fn set_contact_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: LeadId,
    status: &str,
) -> ServiceResult<()>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    let mut book = open_book(repo, user)?;
    book.update_contact_status(id, ContactStatus::from(status.trim()))
}

pub fn toggle_contact_method<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: LeadId,
    method: ContactMethod,
) -> ServiceResult<()>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    let mut book = open_book(repo, user)?;
    book.toggle_contact_method(id, method)
}

/// Returns `false` when the note was blank.
pub fn add_note<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: LeadId,
    content: &str,
) -> ServiceResult<bool>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    let mut book = open_book(repo, user)?;
    book.add_note(id, content)
}

pub fn delete_note<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: LeadId,
    index: usize,
) -> ServiceResult<()>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    let mut book = open_book(repo, user)?;
    book.delete_note(id, index)
}

/// Returns `false` when the industry was blank or already known.
pub fn add_industry<R>(repo: &R, user: &AuthenticatedUser, industry: &str) -> ServiceResult<bool>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    let mut book = open_book(repo, user)?;
    book.add_industry(industry)
}

/// Bulk creates leads parsed from an uploaded CSV file.
pub fn import_leads<R>(
    repo: &R,
    user: &AuthenticatedUser,
    rows: Vec<crate::domain::lead::LeadDetails>,
) -> ServiceResult<usize>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    if rows.is_empty() {
        return Ok(0);
    }
    let mut book = open_book(repo, user)?;
    let created = book.import(rows)?;
    log::info!("Imported {created} leads for {}", book.owner());
    Ok(created)
}
