//! Diesel models for the `leads` table.
//!
//! Contact methods and notes are stored as JSON text columns.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::lead::{
    Lead as DomainLead, LeadDetails, LeadPatch, NewLead as DomainNewLead, Note, Socials,
    UpdateLead as DomainUpdateLead,
};
use crate::domain::types::{
    BusinessName, ContactMethod, ContactStatus, InterestLevel, LeadId, TypeConstraintError,
    UserUid,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::leads)]
/// Diesel model for [`crate::domain::lead::Lead`].
pub struct Lead {
    pub id: i32,
    pub owner_uid: String,
    pub business_name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    pub gbp: Option<String>,
    pub has_website: bool,
    pub interest_level: String,
    pub industry: String,
    pub last_contact_date: String,
    pub contact_status: String,
    pub contact_methods: String,
    pub notes: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::leads)]
/// Insertable form of [`Lead`].
pub struct NewLead<'a> {
    pub owner_uid: &'a str,
    pub business_name: &'a str,
    pub contact_person: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub website: Option<&'a str>,
    pub facebook: Option<&'a str>,
    pub instagram: Option<&'a str>,
    pub linkedin: Option<&'a str>,
    pub gbp: Option<&'a str>,
    pub has_website: bool,
    pub interest_level: &'a str,
    pub industry: &'a str,
    pub last_contact_date: &'a str,
    pub contact_status: &'a str,
    pub contact_methods: String,
    pub notes: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::leads)]
#[diesel(treat_none_as_null = true)]
/// Full replacement of the editable columns of a [`Lead`].
pub struct UpdateLead<'a> {
    pub business_name: &'a str,
    pub contact_person: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub website: Option<&'a str>,
    pub facebook: Option<&'a str>,
    pub instagram: Option<&'a str>,
    pub linkedin: Option<&'a str>,
    pub gbp: Option<&'a str>,
    pub has_website: bool,
    pub interest_level: &'a str,
    pub industry: &'a str,
    pub last_contact_date: &'a str,
    pub contact_status: &'a str,
    pub contact_methods: String,
    pub notes: String,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::leads)]
/// Partial update issued by inline table controls. `None` columns are left
/// untouched.
pub struct PatchLead<'a> {
    pub interest_level: Option<&'a str>,
    pub contact_status: Option<&'a str>,
    pub contact_methods: Option<String>,
    pub last_contact_date: Option<&'a str>,
    pub notes: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

fn encode_methods(methods: &[ContactMethod]) -> String {
    serde_json::to_string(methods).unwrap_or_else(|_| "[]".to_string())
}

fn encode_notes(notes: &[Note]) -> String {
    serde_json::to_string(notes).unwrap_or_else(|_| "[]".to_string())
}

fn decode_json<T: serde::de::DeserializeOwned>(
    column: &str,
    raw: &str,
) -> Result<Vec<T>, TypeConstraintError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("{column}: {e}")))
}

impl TryFrom<Lead> for DomainLead {
    type Error = TypeConstraintError;

    fn try_from(lead: Lead) -> Result<Self, Self::Error> {
        Ok(Self {
            id: LeadId::try_from(lead.id)?,
            owner_uid: UserUid::new(lead.owner_uid)?,
            business_name: BusinessName::new(lead.business_name)?,
            contact_person: lead.contact_person,
            phone: lead.phone,
            email: lead.email,
            website: lead.website,
            socials: Socials {
                facebook: lead.facebook,
                instagram: lead.instagram,
                linkedin: lead.linkedin,
                gbp: lead.gbp,
            },
            has_website: lead.has_website,
            interest_level: InterestLevel::from(lead.interest_level),
            industry: lead.industry,
            last_contact_date: lead.last_contact_date,
            contact_status: ContactStatus::from(lead.contact_status),
            contact_methods: decode_json("contact_methods", &lead.contact_methods)?,
            notes: decode_json("notes", &lead.notes)?,
            created_at: lead.created_at,
            updated_at: lead.updated_at,
        })
    }
}

impl<'a> NewLead<'a> {
    pub fn from_domain(lead: &'a DomainNewLead, now: NaiveDateTime) -> Self {
        let details: &'a LeadDetails = &lead.details;
        Self {
            owner_uid: lead.owner_uid.as_str(),
            business_name: details.business_name.as_str(),
            contact_person: details.contact_person.as_deref(),
            phone: details.phone.as_deref(),
            email: details.email.as_deref(),
            website: details.website.as_deref(),
            facebook: details.socials.facebook.as_deref(),
            instagram: details.socials.instagram.as_deref(),
            linkedin: details.socials.linkedin.as_deref(),
            gbp: details.socials.gbp.as_deref(),
            has_website: lead.has_website,
            interest_level: details.interest_level.as_str(),
            industry: &details.industry,
            last_contact_date: &details.last_contact_date,
            contact_status: details.contact_status.as_str(),
            contact_methods: encode_methods(&details.contact_methods),
            notes: encode_notes(&details.notes),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateLead<'a> {
    pub fn from_domain(update: &'a DomainUpdateLead, now: NaiveDateTime) -> Self {
        let details = &update.details;
        Self {
            business_name: details.business_name.as_str(),
            contact_person: details.contact_person.as_deref(),
            phone: details.phone.as_deref(),
            email: details.email.as_deref(),
            website: details.website.as_deref(),
            facebook: details.socials.facebook.as_deref(),
            instagram: details.socials.instagram.as_deref(),
            linkedin: details.socials.linkedin.as_deref(),
            gbp: details.socials.gbp.as_deref(),
            has_website: update.has_website,
            interest_level: details.interest_level.as_str(),
            industry: &details.industry,
            last_contact_date: &details.last_contact_date,
            contact_status: details.contact_status.as_str(),
            contact_methods: encode_methods(&details.contact_methods),
            notes: encode_notes(&details.notes),
            updated_at: now,
        }
    }
}

impl<'a> PatchLead<'a> {
    pub fn from_domain(patch: &'a LeadPatch, now: NaiveDateTime) -> Self {
        let base = PatchLead {
            updated_at: Some(now),
            ..PatchLead::default()
        };
        match patch {
            LeadPatch::InterestLevel(level) => PatchLead {
                interest_level: Some(level.as_str()),
                ..base
            },
            LeadPatch::ContactStatus(status) => PatchLead {
                contact_status: Some(status.as_str()),
                ..base
            },
            LeadPatch::ContactMethods {
                methods,
                last_contact_date,
            } => PatchLead {
                contact_methods: Some(encode_methods(methods)),
                last_contact_date: Some(last_contact_date),
                ..base
            },
            LeadPatch::Notes(notes) => PatchLead {
                notes: Some(encode_notes(notes)),
                ..base
            },
        }
    }
}
