//! Lead aggregate and its write payloads.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::datetime::Timestamp;
use crate::domain::types::{
    BusinessName, ContactMethod, ContactStatus, InterestLevel, LeadId, UserUid,
};

/// Social profile links of a lead.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Socials {
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    /// Google Business Profile.
    pub gbp: Option<String>,
}

impl Socials {
    #[must_use]
    pub fn new(
        facebook: Option<String>,
        instagram: Option<String>,
        linkedin: Option<String>,
        gbp: Option<String>,
    ) -> Self {
        Self {
            facebook: normalize_optional(facebook),
            instagram: normalize_optional(instagram),
            linkedin: normalize_optional(linkedin),
            gbp: normalize_optional(gbp),
        }
    }
}

/// A dated free-text note attached to a lead.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    pub content: String,
    pub date: String,
    pub time: String,
    pub timestamp: String,
}

impl Note {
    /// Builds a note from trimmed content; blank content yields `None`.
    pub fn new(content: &str, stamp: Timestamp) -> Option<Self> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        Some(Self {
            content: content.to_string(),
            date: stamp.date,
            time: stamp.time,
            timestamp: stamp.formatted,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub id: LeadId,
    pub owner_uid: UserUid,
    pub business_name: BusinessName,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub socials: Socials,
    /// Whether `website` was non-empty when the lead was last saved.
    pub has_website: bool,
    pub interest_level: InterestLevel,
    pub industry: String,
    /// `MM/DD/YY`.
    pub last_contact_date: String,
    pub contact_status: ContactStatus,
    pub contact_methods: Vec<ContactMethod>,
    /// Newest first.
    pub notes: Vec<Note>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Lead {
    pub fn has_contact_method(&self, method: ContactMethod) -> bool {
        self.contact_methods.contains(&method)
    }
}

/// Editable lead fields shared by the add and edit forms.
#[derive(Clone, Debug, PartialEq)]
pub struct LeadDetails {
    pub business_name: BusinessName,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub socials: Socials,
    pub interest_level: InterestLevel,
    pub industry: String,
    pub last_contact_date: String,
    pub contact_status: ContactStatus,
    pub contact_methods: Vec<ContactMethod>,
    pub notes: Vec<Note>,
}

impl LeadDetails {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        business_name: BusinessName,
        contact_person: Option<String>,
        phone: Option<String>,
        email: Option<String>,
        website: Option<String>,
        socials: Socials,
        interest_level: InterestLevel,
        industry: String,
        last_contact_date: String,
        contact_status: ContactStatus,
        contact_methods: Vec<ContactMethod>,
        notes: Vec<Note>,
    ) -> Self {
        Self {
            business_name,
            contact_person: normalize_optional(contact_person),
            phone: normalize_optional(phone),
            email: normalize_optional(email).map(|s| s.to_lowercase()),
            website: normalize_optional(website),
            socials,
            interest_level,
            industry: industry.trim().to_string(),
            last_contact_date,
            contact_status,
            contact_methods: dedup_methods(contact_methods),
            notes,
        }
    }

    /// Derived at save time only.
    pub fn has_website(&self) -> bool {
        self.website.as_deref().is_some_and(|w| !w.is_empty())
    }
}

/// Payload for creating a lead owned by `owner_uid`.
#[derive(Clone, Debug)]
pub struct NewLead {
    pub owner_uid: UserUid,
    pub details: LeadDetails,
    pub has_website: bool,
}

impl NewLead {
    #[must_use]
    pub fn new(owner_uid: UserUid, details: LeadDetails) -> Self {
        let has_website = details.has_website();
        Self {
            owner_uid,
            details,
            has_website,
        }
    }
}

/// Full replacement of a lead's editable fields.
#[derive(Clone, Debug)]
pub struct UpdateLead {
    pub details: LeadDetails,
    pub has_website: bool,
}

impl UpdateLead {
    #[must_use]
    pub fn new(details: LeadDetails) -> Self {
        let has_website = details.has_website();
        Self {
            details,
            has_website,
        }
    }
}

/// Field-level change issued by the inline table controls and note editor.
#[derive(Clone, Debug, PartialEq)]
pub enum LeadPatch {
    InterestLevel(InterestLevel),
    ContactStatus(ContactStatus),
    ContactMethods {
        methods: Vec<ContactMethod>,
        last_contact_date: String,
    },
    Notes(Vec<Note>),
}

impl LeadPatch {
    /// Applies the change to an in-memory lead.
    pub fn apply(&self, lead: &mut Lead) {
        match self {
            LeadPatch::InterestLevel(level) => lead.interest_level = level.clone(),
            LeadPatch::ContactStatus(status) => lead.contact_status = status.clone(),
            LeadPatch::ContactMethods {
                methods,
                last_contact_date,
            } => {
                lead.contact_methods = methods.clone();
                lead.last_contact_date = last_contact_date.clone();
            }
            LeadPatch::Notes(notes) => lead.notes = notes.clone(),
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn dedup_methods(methods: Vec<ContactMethod>) -> Vec<ContactMethod> {
    let mut unique = Vec::with_capacity(methods.len());
    for method in methods {
        if !unique.contains(&method) {
            unique.push(method);
        }
    }
    unique
}
