use serde::Deserialize;

use crate::domain::view::{IndustryFilter, ListSelection, SortDirection, SortKey, ViewState};
use crate::dto::api::{LeadDocument, LeadsResponse};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{LeadReader, LeadWriter, SavedListReader, SavedListWriter};
use crate::services::ServiceResult;
use crate::services::lead::open_book;

/// Query parameters accepted by the `/api/v1/leads` service.
///
/// Unlike the index page the API keeps no session state: every request
/// describes its view in full.
#[derive(Debug, Default, Deserialize)]
pub struct LeadsQuery {
    pub industry: Option<String>,
    pub list: Option<String>,
    pub sort: Option<String>,
    /// `descending` reverses the sort; anything else sorts ascending.
    pub direction: Option<String>,
}

impl LeadsQuery {
    fn into_view(self) -> ServiceResult<ViewState> {
        let mut view = ViewState::default();

        if let Some(industry) = self.industry.as_deref() {
            view.industry = IndustryFilter::from_label(industry);
        }
        if let Some(list) = self.list.as_deref() {
            view.list = ListSelection::from_label(list);
        }
        if let Some(sort) = self.sort.as_deref() {
            view.sort.key = Some(sort.parse::<SortKey>()?);
            if self.direction.as_deref() == Some(SortDirection::Descending.as_str()) {
                view.sort.direction = SortDirection::Descending;
            }
        }

        Ok(view)
    }
}

/// Returns the user's leads filtered and sorted as requested.
pub fn list_leads<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: LeadsQuery,
) -> ServiceResult<LeadsResponse>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    let view = params.into_view()?;
    let book = open_book(repo, user)?;

    let leads: Vec<LeadDocument> = view
        .derive(book.leads(), book.lists())
        .into_iter()
        .map(LeadDocument::from)
        .collect();

    Ok(LeadsResponse {
        total: leads.len(),
        industry: view.industry.label().to_string(),
        list: view.list.label().to_string(),
        leads,
    })
}
