//! Derived view over a user's lead collection.
//!
//! The table shown on the index page is always computed from the full,
//! canonical set of leads: the industry and saved-list filters run first and
//! the configured sort is applied to what remains.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::datetime::parse_display_date;
use crate::domain::lead::Lead;
use crate::domain::saved_list::{ALL_LEADS, SavedList};
use crate::domain::types::{LeadId, TypeConstraintError};

/// Name of the pseudo industry that selects every lead.
pub const ALL_INDUSTRIES: &str = "All";

/// Column a lead table can be ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    BusinessName,
    ContactPerson,
    Phone,
    Email,
    InterestLevel,
    Industry,
    LastContactDate,
    ContactStatus,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::BusinessName,
        SortKey::ContactPerson,
        SortKey::Phone,
        SortKey::Email,
        SortKey::InterestLevel,
        SortKey::Industry,
        SortKey::LastContactDate,
        SortKey::ContactStatus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::BusinessName => "businessName",
            SortKey::ContactPerson => "contactPerson",
            SortKey::Phone => "phone",
            SortKey::Email => "email",
            SortKey::InterestLevel => "interestLevel",
            SortKey::Industry => "industry",
            SortKey::LastContactDate => "lastContactDate",
            SortKey::ContactStatus => "contactStatus",
        }
    }

    fn compare(self, a: &Lead, b: &Lead) -> Ordering {
        fn text(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or_default()
        }

        match self {
            SortKey::BusinessName => a.business_name.as_str().cmp(b.business_name.as_str()),
            SortKey::ContactPerson => text(&a.contact_person).cmp(text(&b.contact_person)),
            SortKey::Phone => text(&a.phone).cmp(text(&b.phone)),
            SortKey::Email => text(&a.email).cmp(text(&b.email)),
            SortKey::InterestLevel => a.interest_level.rank().cmp(&b.interest_level.rank()),
            SortKey::Industry => a.industry.cmp(&b.industry),
            // Pairs where either side is not a valid `MM/DD/YY` date fall back
            // to comparing the raw strings.
            SortKey::LastContactDate => match (
                parse_display_date(&a.last_contact_date),
                parse_display_date(&b.last_contact_date),
            ) {
                (Some(left), Some(right)) => left.cmp(&right),
                _ => a.last_contact_date.cmp(&b.last_contact_date),
            },
            SortKey::ContactStatus => a.contact_status.as_str().cmp(b.contact_status.as_str()),
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("sort key {s}")))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

/// Active sort of the lead table. No key keeps the stored order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Clicking the active ascending column flips it; any other click sorts
    /// ascending by the clicked column.
    pub fn request_sort(&mut self, key: SortKey) {
        self.direction = if self.key == Some(key) && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        self.key = Some(key);
    }

    /// Stable sort of `leads` in place.
    pub fn sort(&self, leads: &mut [&Lead]) {
        let Some(key) = self.key else {
            return;
        };
        leads.sort_by(|a, b| {
            let ordering = key.compare(a, b);
            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndustryFilter {
    #[default]
    All,
    Only(String),
}

impl IndustryFilter {
    /// Maps the sidebar label onto a filter; `"All"` clears it.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_INDUSTRIES {
            IndustryFilter::All
        } else {
            IndustryFilter::Only(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            IndustryFilter::All => ALL_INDUSTRIES,
            IndustryFilter::Only(name) => name,
        }
    }

    fn matches(&self, lead: &Lead) -> bool {
        match self {
            IndustryFilter::All => true,
            IndustryFilter::Only(name) => &lead.industry == name,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListSelection {
    #[default]
    AllLeads,
    Named(String),
}

impl ListSelection {
    /// Maps the sidebar label onto a selection; `"All Leads"` clears it.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_LEADS {
            ListSelection::AllLeads
        } else {
            ListSelection::Named(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ListSelection::AllLeads => ALL_LEADS,
            ListSelection::Named(name) => name,
        }
    }
}

/// Dialog currently open over the lead table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveModal {
    #[default]
    None,
    NewLead,
    EditLead(LeadId),
    NewList,
    NewIndustry,
}

/// Per-user state of the index page, kept in the session between requests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub sort: SortConfig,
    pub industry: IndustryFilter,
    pub list: ListSelection,
    pub modal: ActiveModal,
}

impl ViewState {
    /// Picking an industry also clears the selected list.
    pub fn select_industry(&mut self, label: &str) {
        self.industry = IndustryFilter::from_label(label);
        self.list = ListSelection::AllLeads;
    }

    /// Falls back to "All Leads" when the removed list was selected.
    pub fn forget_list(&mut self, name: &str) {
        if self.list.label() == name {
            self.list = ListSelection::AllLeads;
        }
    }

    /// Filters then sorts the canonical collection.
    pub fn derive<'a>(&self, leads: &'a [Lead], lists: &[SavedList]) -> Vec<&'a Lead> {
        derive_view(leads, lists, self)
    }
}

/// Builds the rows shown for `state` from the full lead collection.
///
/// An unknown list name leaves the collection unfiltered.
pub fn derive_view<'a>(leads: &'a [Lead], lists: &[SavedList], state: &ViewState) -> Vec<&'a Lead> {
    let list = match &state.list {
        ListSelection::AllLeads => None,
        ListSelection::Named(name) => lists.iter().find(|list| list.name.as_str() == name),
    };

    let mut rows: Vec<&Lead> = leads
        .iter()
        .filter(|lead| state.industry.matches(lead))
        .filter(|lead| list.is_none_or(|list| list.criteria.matches(lead)))
        .collect();

    state.sort.sort(&mut rows);
    rows
}

/// Number of leads in the named list; unknown names count zero.
pub fn count_in_list(leads: &[Lead], lists: &[SavedList], name: &str) -> usize {
    if name == ALL_LEADS {
        return leads.len();
    }
    lists
        .iter()
        .find(|list| list.name.as_str() == name)
        .map_or(0, |list| {
            leads.iter().filter(|lead| list.criteria.matches(lead)).count()
        })
}

pub fn count_in_industry(leads: &[Lead], industry: &str) -> usize {
    if industry == ALL_INDUSTRIES {
        return leads.len();
    }
    leads.iter().filter(|lead| lead.industry == industry).count()
}

/// Distinct industries in first-seen order.
pub fn unique_industries(leads: &[Lead]) -> Vec<String> {
    let mut industries: Vec<String> = Vec::new();
    for lead in leads {
        if !industries.contains(&lead.industry) {
            industries.push(lead.industry.clone());
        }
    }
    industries
}
