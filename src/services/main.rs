//! Index page: the derived lead table with its sidebar.

use crate::domain::datetime::today_display;
use crate::domain::lead::Lead;
use crate::domain::saved_list::{ALL_LEADS, SavedList};
use crate::domain::types::LeadId;
use crate::domain::view::{
    ALL_INDUSTRIES, ActiveModal, ListSelection, SortKey, ViewState, count_in_industry,
    count_in_list, unique_industries,
};
use crate::dto::main::{
    FormOptions, IndexPageData, IndustryEntry, LeadFormValues, LeadRow, ListEntry, SortColumn,
};
pub use crate::dto::main::IndexQuery;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{LeadReader, LeadWriter, SavedListReader, SavedListWriter};
use crate::services::ServiceResult;
use crate::services::lead_book::LeadBook;

/// Loads the user's collections and renders them through `view`.
///
/// A dialog for a missing lead is closed in `view`, so the caller should
/// store the state back into the session.
pub fn load_index_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    view: &mut ViewState,
) -> ServiceResult<IndexPageData>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    let owner = user.owner_uid()?;
    let book = LeadBook::load(repo, owner)?;

    Ok(build_page(book.leads(), book.lists(), view))
}

/// Folds the index query parameters into the view state.
///
/// `sort` toggles relative to the current state, so the query must be
/// applied once per click and never on a page reload.
pub fn apply_query(view: &mut ViewState, query: IndexQuery) {
    if let Some(sort) = query.sort.as_deref() {
        match sort.parse::<SortKey>() {
            Ok(key) => view.sort.request_sort(key),
            Err(err) => log::warn!("Ignoring {err}"),
        }
    }

    if let Some(industry) = query.industry.as_deref() {
        view.select_industry(industry);
    }

    if let Some(list) = query.list.as_deref() {
        view.list = ListSelection::from_label(list);
    }

    if query.close.is_some() {
        view.modal = ActiveModal::None;
    } else if let Some(modal) = query.modal.as_deref() {
        let lead = query.lead.and_then(|id| LeadId::new(id).ok());
        view.modal = match (modal, lead) {
            ("new-lead", _) => ActiveModal::NewLead,
            ("new-list", _) => ActiveModal::NewList,
            ("new-industry", _) => ActiveModal::NewIndustry,
            ("edit-lead", Some(id)) => ActiveModal::EditLead(id),
            _ => ActiveModal::None,
        };
    }
}

/// Builds the page from the canonical collections; a dialog for a lead
/// that no longer exists is closed.
pub fn build_page(leads: &[Lead], lists: &[SavedList], view: &mut ViewState) -> IndexPageData {
    let today = today_display();
    let editing = match view.modal {
        ActiveModal::EditLead(id) => leads.iter().find(|lead| lead.id == id),
        _ => None,
    };
    if matches!(view.modal, ActiveModal::EditLead(_)) && editing.is_none() {
        view.modal = ActiveModal::None;
    }
    let lead_form = editing.map_or_else(|| LeadFormValues::blank(&today), LeadFormValues::from);

    let rows = view.derive(leads, lists).into_iter().map(LeadRow::from).collect();

    let selected_list = view.list.label();
    let mut list_entries = vec![ListEntry {
        id: None,
        name: ALL_LEADS.to_string(),
        count: leads.len(),
        selected: selected_list == ALL_LEADS,
    }];
    list_entries.extend(lists.iter().map(|list| ListEntry {
        id: Some(list.id.get()),
        name: list.name.as_str().to_string(),
        count: count_in_list(leads, lists, list.name.as_str()),
        selected: selected_list == list.name.as_str(),
    }));

    let industry_names = unique_industries(leads);
    let selected_industry = view.industry.label();
    let industries = std::iter::once(ALL_INDUSTRIES.to_string())
        .chain(industry_names.iter().cloned())
        .map(|name| IndustryEntry {
            count: count_in_industry(leads, &name),
            selected: selected_industry == name,
            name,
        })
        .collect();

    IndexPageData {
        rows,
        lists: list_entries,
        industries,
        industry_names,
        columns: SortColumn::columns(&view.sort),
        modal: view.modal,
        lead_form,
        options: FormOptions::default(),
        today,
    }
}
