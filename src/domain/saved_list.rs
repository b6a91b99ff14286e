//! Saved lists: named filter definitions over the lead collection.
//!
//! A list persists only the data describing its filter. The predicate is
//! rebuilt from that data with [`build_predicate`] wherever it is needed.

use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::lead::Lead;
use crate::domain::types::{ContactStatus, InterestLevel, ListName, SavedListId, UserUid};

/// Name of the pseudo list that selects every lead.
pub const ALL_LEADS: &str = "All Leads";

/// Stored discriminator of a list filter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterType {
    InterestLevel,
    ContactStatus,
    Industry,
    HasWebsite,
    Multi,
    Other(String),
}

impl FilterType {
    pub fn as_str(&self) -> &str {
        match self {
            FilterType::InterestLevel => "interestLevel",
            FilterType::ContactStatus => "contactStatus",
            FilterType::Industry => "industry",
            FilterType::HasWebsite => "hasWebsite",
            FilterType::Multi => "multi",
            FilterType::Other(s) => s,
        }
    }

    /// Whether the type accepts several values at once.
    pub fn is_multi_valued(&self) -> bool {
        matches!(
            self,
            FilterType::InterestLevel | FilterType::ContactStatus | FilterType::Industry
        )
    }
}

impl Display for FilterType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for FilterType {
    fn from(s: &str) -> Self {
        match s {
            "interestLevel" => FilterType::InterestLevel,
            "contactStatus" => FilterType::ContactStatus,
            "industry" => FilterType::Industry,
            "hasWebsite" => FilterType::HasWebsite,
            "multi" => FilterType::Multi,
            _ => FilterType::Other(s.to_string()),
        }
    }
}

impl From<String> for FilterType {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<FilterType> for String {
    fn from(value: FilterType) -> Self {
        value.as_str().to_string()
    }
}

/// Either a single value or a set of accepted values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueMatch<T> {
    One(T),
    AnyOf(Vec<T>),
}

impl<T: PartialEq> ValueMatch<T> {
    /// Array form wins when non-empty, as stored lists may carry both.
    pub fn from_stored(value: Option<T>, values: Vec<T>) -> Self {
        match value {
            _ if !values.is_empty() => ValueMatch::AnyOf(values),
            Some(value) => ValueMatch::One(value),
            None => ValueMatch::AnyOf(Vec::new()),
        }
    }

    pub fn matches(&self, candidate: &T) -> bool {
        match self {
            ValueMatch::One(value) => value == candidate,
            ValueMatch::AnyOf(values) => values.contains(candidate),
        }
    }
}

/// Base filter of a saved list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListFilter {
    InterestLevel(ValueMatch<InterestLevel>),
    ContactStatus(ValueMatch<ContactStatus>),
    Industry(ValueMatch<String>),
    HasWebsite(bool),
    /// Matches everything; carries exclusions only.
    Multi,
    /// Unrecognised stored type; matches everything.
    Unknown(String),
}

impl ListFilter {
    pub fn filter_type(&self) -> FilterType {
        match self {
            ListFilter::InterestLevel(_) => FilterType::InterestLevel,
            ListFilter::ContactStatus(_) => FilterType::ContactStatus,
            ListFilter::Industry(_) => FilterType::Industry,
            ListFilter::HasWebsite(_) => FilterType::HasWebsite,
            ListFilter::Multi => FilterType::Multi,
            ListFilter::Unknown(kind) => FilterType::Other(kind.clone()),
        }
    }

    fn matches(&self, lead: &Lead) -> bool {
        match self {
            ListFilter::InterestLevel(values) => values.matches(&lead.interest_level),
            ListFilter::ContactStatus(values) => values.matches(&lead.contact_status),
            ListFilter::Industry(values) => values.matches(&lead.industry),
            ListFilter::HasWebsite(expected) => lead.has_website == *expected,
            ListFilter::Multi | ListFilter::Unknown(_) => true,
        }
    }
}

/// Complete filter description of a saved list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCriteria {
    pub filter: ListFilter,
    pub exclude_interest_levels: Vec<InterestLevel>,
    pub exclude_contact_statuses: Vec<ContactStatus>,
}

impl ListCriteria {
    #[must_use]
    pub fn new(filter: ListFilter) -> Self {
        Self {
            filter,
            exclude_interest_levels: Vec::new(),
            exclude_contact_statuses: Vec::new(),
        }
    }

    #[must_use]
    pub fn excluding(
        mut self,
        interest_levels: Vec<InterestLevel>,
        contact_statuses: Vec<ContactStatus>,
    ) -> Self {
        self.exclude_interest_levels = interest_levels;
        self.exclude_contact_statuses = contact_statuses;
        self
    }

    /// Base filter first, then the exclusion pass.
    pub fn matches(&self, lead: &Lead) -> bool {
        self.filter.matches(lead)
            && !self.exclude_interest_levels.contains(&lead.interest_level)
            && !self.exclude_contact_statuses.contains(&lead.contact_status)
    }
}

/// Builds the lead predicate described by `criteria`.
pub fn build_predicate(criteria: &ListCriteria) -> impl Fn(&Lead) -> bool + '_ {
    move |lead| criteria.matches(lead)
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SavedList {
    pub id: SavedListId,
    pub owner_uid: UserUid,
    pub name: ListName,
    pub criteria: ListCriteria,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewSavedList {
    pub owner_uid: UserUid,
    pub name: ListName,
    pub criteria: ListCriteria,
}

impl NewSavedList {
    #[must_use]
    pub fn new(owner_uid: UserUid, name: ListName, criteria: ListCriteria) -> Self {
        Self {
            owner_uid,
            name,
            criteria,
        }
    }

    /// Lists created for an account that has none yet.
    pub fn defaults(owner_uid: &UserUid) -> Vec<NewSavedList> {
        [
            ("Cold Leads", InterestLevel::Cold),
            ("Warm Leads", InterestLevel::Warm),
            ("Hot Leads", InterestLevel::Hot),
            ("Converted Leads", InterestLevel::Converted),
            ("Inactive Leads", InterestLevel::Inactive),
        ]
        .into_iter()
        .filter_map(|(name, level)| {
            let name = ListName::new(name).ok()?;
            let criteria = ListCriteria::new(ListFilter::InterestLevel(ValueMatch::One(level)));
            Some(NewSavedList::new(owner_uid.clone(), name, criteria))
        })
        .collect()
    }
}
