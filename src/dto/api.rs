//! DTOs exposed by the JSON API.

use serde::Serialize;

use crate::domain::lead::{Lead, Note, Socials};
use crate::domain::types::ContactMethod;

/// Lead in the document shape used by API clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDocument {
    pub id: i32,
    pub business_name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub socials: Socials,
    pub has_website: bool,
    pub interest_level: String,
    pub industry: String,
    pub last_contact_date: String,
    pub contact_status: String,
    pub contact_methods: Vec<ContactMethod>,
    pub notes: Vec<Note>,
}

impl From<&Lead> for LeadDocument {
    fn from(lead: &Lead) -> Self {
        Self {
            id: lead.id.get(),
            business_name: lead.business_name.as_str().to_string(),
            contact_person: lead.contact_person.clone(),
            phone: lead.phone.clone(),
            email: lead.email.clone(),
            website: lead.website.clone(),
            socials: lead.socials.clone(),
            has_website: lead.has_website,
            interest_level: lead.interest_level.as_str().to_string(),
            industry: lead.industry.clone(),
            last_contact_date: lead.last_contact_date.clone(),
            contact_status: lead.contact_status.as_str().to_string(),
            contact_methods: lead.contact_methods.clone(),
            notes: lead.notes.clone(),
        }
    }
}

/// Result payload returned by [`crate::services::api::list_leads`].
#[derive(Debug, Serialize)]
pub struct LeadsResponse {
    /// Number of leads in the derived view.
    pub total: usize,
    pub industry: String,
    pub list: String,
    pub leads: Vec<LeadDocument>,
}
