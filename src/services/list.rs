//! Saved list workflows of the sidebar.

use crate::domain::types::SavedListId;
use crate::domain::view::ViewState;
use crate::forms::list::{AddListForm, AddListPayload};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{LeadReader, LeadWriter, SavedListReader, SavedListWriter};
use crate::services::ServiceResult;
use crate::services::lead::open_book;

/// Creates a saved list from the "Create New List" dialog.
pub fn add_list<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddListForm,
) -> ServiceResult<SavedListId>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    let payload = AddListPayload::try_from(form)?;
    let mut book = open_book(repo, user)?;

    let id = book.add_list(payload.name, payload.criteria)?;
    log::info!("Created saved list {id} for {}", book.owner());
    Ok(id)
}

/// Deletes a saved list; `view` falls back to all leads when the list was
/// selected.
pub fn delete_list<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: SavedListId,
    view: &mut ViewState,
) -> ServiceResult<()>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    let mut book = open_book(repo, user)?;
    book.delete_list(id, view)
}
