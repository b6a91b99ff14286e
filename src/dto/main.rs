//! DTOs rendered by the index page.

use serde::{Deserialize, Serialize};

use crate::domain::lead::{Lead, Note, Socials};
use crate::domain::types::{ContactMethod, ContactStatus, InterestLevel};
use crate::domain::view::{ActiveModal, SortConfig, SortKey};

/// Query parameters accepted by the index page.
///
/// Each present parameter updates the view state kept in the session.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    /// Column to sort by; repeating the active column flips the direction.
    pub sort: Option<String>,
    pub industry: Option<String>,
    pub list: Option<String>,
    /// `new-lead`, `new-list`, `new-industry` or `edit-lead`.
    pub modal: Option<String>,
    /// Lead opened by `modal=edit-lead`.
    pub lead: Option<i32>,
    /// Closes the open dialog.
    pub close: Option<String>,
}

impl IndexQuery {
    /// Whether the request carries any view parameter.
    pub fn is_empty(&self) -> bool {
        self.sort.is_none()
            && self.industry.is_none()
            && self.list.is_none()
            && self.modal.is_none()
            && self.lead.is_none()
            && self.close.is_none()
    }
}

/// One table row.
#[derive(Debug, Clone, Serialize)]
pub struct LeadRow {
    pub id: i32,
    pub business_name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    /// Absolute link for the "Has Website" badge.
    pub website_href: Option<String>,
    pub has_website: bool,
    pub socials: Socials,
    pub interest_level: String,
    pub interest_color: &'static str,
    pub industry: String,
    pub last_contact_date: String,
    pub contact_status: String,
    pub status_color: &'static str,
    pub converted: bool,
    pub methods: Vec<MethodToggle>,
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodToggle {
    pub method: &'static str,
    pub active: bool,
}

impl From<&Lead> for LeadRow {
    fn from(lead: &Lead) -> Self {
        let website_href = lead.website.as_deref().map(|site| {
            if site.starts_with("http://") || site.starts_with("https://") {
                site.to_string()
            } else {
                format!("https://{site}")
            }
        });

        Self {
            id: lead.id.get(),
            business_name: lead.business_name.as_str().to_string(),
            contact_person: lead.contact_person.clone(),
            phone: lead.phone.clone(),
            email: lead.email.clone(),
            website: lead.website.clone(),
            website_href,
            has_website: lead.has_website,
            socials: lead.socials.clone(),
            interest_level: lead.interest_level.as_str().to_string(),
            interest_color: lead.interest_level.color(),
            industry: lead.industry.clone(),
            last_contact_date: lead.last_contact_date.clone(),
            contact_status: lead.contact_status.as_str().to_string(),
            status_color: lead.contact_status.color(),
            converted: lead.interest_level == InterestLevel::Converted,
            methods: ContactMethod::ALL
                .into_iter()
                .map(|method| MethodToggle {
                    method: method.as_str(),
                    active: lead.has_contact_method(method),
                })
                .collect(),
            notes: lead.notes.clone(),
        }
    }
}

/// Sidebar entry of a saved list; `id` is absent for "All Leads".
#[derive(Debug, Clone, Serialize)]
pub struct ListEntry {
    pub id: Option<i32>,
    pub name: String,
    pub count: usize,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndustryEntry {
    pub name: String,
    pub count: usize,
    pub selected: bool,
}

/// Sortable table header.
#[derive(Debug, Clone, Serialize)]
pub struct SortColumn {
    pub key: &'static str,
    pub label: &'static str,
    /// `ascending`/`descending` on the active column.
    pub direction: Option<&'static str>,
}

impl SortColumn {
    pub fn columns(sort: &SortConfig) -> Vec<SortColumn> {
        [
            (SortKey::BusinessName, "Business Name"),
            (SortKey::ContactPerson, "Contact Person"),
            (SortKey::InterestLevel, "Interest Level"),
            (SortKey::Industry, "Industry"),
            (SortKey::LastContactDate, "Last Contact"),
            (SortKey::ContactStatus, "Contact Status"),
        ]
        .into_iter()
        .map(|(key, label)| SortColumn {
            key: key.as_str(),
            label,
            direction: (sort.key == Some(key)).then(|| sort.direction.as_str()),
        })
        .collect()
    }
}

/// Choices offered by the selects of the page.
#[derive(Debug, Clone, Serialize)]
pub struct FormOptions {
    pub interest_levels: Vec<String>,
    pub contact_statuses: Vec<String>,
    pub contact_methods: Vec<&'static str>,
    pub filter_types: Vec<(&'static str, &'static str)>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            interest_levels: InterestLevel::ALL.iter().map(|l| l.as_str().to_string()).collect(),
            contact_statuses: ContactStatus::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            contact_methods: ContactMethod::ALL.iter().map(ContactMethod::as_str).collect(),
            filter_types: vec![
                ("interestLevel", "Interest Level"),
                ("contactStatus", "Contact Status"),
                ("industry", "Industry"),
                ("hasWebsite", "Has Website"),
                ("multi", "Multi-Criteria"),
            ],
        }
    }
}

/// Prefilled values of the add/edit lead dialog.
#[derive(Debug, Clone, Serialize)]
pub struct LeadFormValues {
    /// Lead being edited; absent for a new lead.
    pub id: Option<i32>,
    pub business_name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub facebook: String,
    pub instagram: String,
    pub linkedin: String,
    pub gbp: String,
    pub interest_level: String,
    pub industry: String,
    pub last_contact_date: String,
    pub contact_status: String,
    pub contact_methods: Vec<&'static str>,
    pub notes: Vec<Note>,
}

impl LeadFormValues {
    /// Values of the "Add New Lead" dialog.
    pub fn blank(today: &str) -> Self {
        Self {
            id: None,
            business_name: String::new(),
            contact_person: String::new(),
            phone: String::new(),
            email: String::new(),
            website: String::new(),
            facebook: String::new(),
            instagram: String::new(),
            linkedin: String::new(),
            gbp: String::new(),
            interest_level: InterestLevel::Cold.as_str().to_string(),
            industry: String::new(),
            last_contact_date: today.to_string(),
            contact_status: ContactStatus::NotContacted.as_str().to_string(),
            contact_methods: Vec::new(),
            notes: Vec::new(),
        }
    }
}

impl From<&Lead> for LeadFormValues {
    fn from(lead: &Lead) -> Self {
        fn text(value: &Option<String>) -> String {
            value.clone().unwrap_or_default()
        }

        Self {
            id: Some(lead.id.get()),
            business_name: lead.business_name.as_str().to_string(),
            contact_person: text(&lead.contact_person),
            phone: text(&lead.phone),
            email: text(&lead.email),
            website: text(&lead.website),
            facebook: text(&lead.socials.facebook),
            instagram: text(&lead.socials.instagram),
            linkedin: text(&lead.socials.linkedin),
            gbp: text(&lead.socials.gbp),
            interest_level: lead.interest_level.as_str().to_string(),
            industry: lead.industry.clone(),
            last_contact_date: lead.last_contact_date.clone(),
            contact_status: lead.contact_status.as_str().to_string(),
            contact_methods: lead.contact_methods.iter().map(ContactMethod::as_str).collect(),
            notes: lead.notes.clone(),
        }
    }
}

/// Data required to render the main index template.
#[derive(Debug)]
pub struct IndexPageData {
    pub rows: Vec<LeadRow>,
    pub lists: Vec<ListEntry>,
    pub industries: Vec<IndustryEntry>,
    /// Industry names without the "All" pseudo entry.
    pub industry_names: Vec<String>,
    pub columns: Vec<SortColumn>,
    pub modal: ActiveModal,
    /// Values of the open lead dialog.
    pub lead_form: LeadFormValues,
    pub options: FormOptions,
    pub today: String,
}
