use serde::Deserialize;
use validator::Validate;

use crate::domain::datetime::{Timestamp, is_display_date, to_display_date};
use crate::domain::lead::{LeadDetails, Note, Socials};
use crate::domain::types::{BusinessName, ContactMethod, ContactStatus, InterestLevel};
use crate::forms::FormError;

/// Fields of the add and edit lead dialogs.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct LeadForm {
    #[validate(length(max = 200, message = "Business name must be at most 200 characters."))]
    pub business_name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub interest_level: Option<String>,
    #[serde(default)]
    pub last_contact_date: Option<String>,
    #[serde(default)]
    pub contact_status: Option<String>,
    #[serde(default)]
    pub contact_methods: Vec<String>,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub gbp: Option<String>,
    /// Note typed into the dialog; prepended on save.
    #[serde(default)]
    pub current_note: Option<String>,
}

/// Checked lead form, still missing the values that depend on the stored lead.
#[derive(Debug, Clone)]
pub struct LeadPayload {
    pub business_name: BusinessName,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub socials: Socials,
    pub interest_level: InterestLevel,
    pub industry: String,
    /// `None` when the submitted date was blank or malformed.
    pub last_contact_date: Option<String>,
    pub contact_status: ContactStatus,
    pub contact_methods: Vec<ContactMethod>,
    pub note: Option<String>,
}

impl TryFrom<LeadForm> for LeadPayload {
    type Error = FormError;

    fn try_from(form: LeadForm) -> Result<Self, Self::Error> {
        let business_name =
            BusinessName::new(form.business_name).map_err(|_| FormError::MissingBusinessName)?;

        let contact_methods = form
            .contact_methods
            .iter()
            .map(|value| {
                value
                    .parse::<ContactMethod>()
                    .map_err(|_| FormError::InvalidContactMethod(value.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            business_name,
            contact_person: form.contact_person,
            phone: form.phone,
            email: form.email,
            website: form.website,
            socials: Socials::new(form.facebook, form.instagram, form.linkedin, form.gbp),
            interest_level: form
                .interest_level
                .map(InterestLevel::from)
                .unwrap_or_default(),
            industry: form.industry,
            last_contact_date: form.last_contact_date.as_deref().and_then(accept_date),
            contact_status: form
                .contact_status
                .map(ContactStatus::from)
                .unwrap_or_default(),
            contact_methods,
            note: form.current_note,
        })
    }
}

impl LeadPayload {
    /// Completes the payload into lead details.
    ///
    /// A rejected date falls back to `fallback_date`. The typed note, if any,
    /// is stamped with `stamp` and put in front of `notes`.
    pub fn into_details(self, fallback_date: String, notes: Vec<Note>, stamp: Timestamp) -> LeadDetails {
        let mut all_notes = Vec::with_capacity(notes.len() + 1);
        all_notes.extend(self.note.as_deref().and_then(|content| Note::new(content, stamp)));
        all_notes.extend(notes);

        LeadDetails::new(
            self.business_name,
            self.contact_person,
            self.phone,
            self.email,
            self.website,
            self.socials,
            self.interest_level,
            self.industry,
            self.last_contact_date.unwrap_or(fallback_date),
            self.contact_status,
            self.contact_methods,
            all_notes,
        )
    }
}

/// Accepts `MM/DD/YY`, or the `YYYY-MM-DD` value sent by date pickers.
fn accept_date(value: &str) -> Option<String> {
    let value = value.trim();
    let display = if value.len() == 10 && value.as_bytes()[4] == b'-' {
        to_display_date(value)
    } else {
        value.to_string()
    };
    is_display_date(&display).then_some(display)
}

#[derive(Deserialize)]
pub struct InterestLevelForm {
    pub interest_level: String,
}

#[derive(Deserialize)]
pub struct ContactStatusForm {
    pub contact_status: String,
}

#[derive(Deserialize)]
pub struct ContactMethodForm {
    pub method: String,
}

impl TryFrom<ContactMethodForm> for ContactMethod {
    type Error = FormError;

    fn try_from(form: ContactMethodForm) -> Result<Self, Self::Error> {
        form.method
            .parse()
            .map_err(|_| FormError::InvalidContactMethod(form.method))
    }
}

#[derive(Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize)]
pub struct DeleteLeadForm {
    #[serde(default)]
    pub confirm: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp() -> Timestamp {
        Timestamp {
            date: "04/21/25".to_string(),
            time: "10:05 AM".to_string(),
            formatted: "04/21/25 10:05 AM".to_string(),
        }
    }

    fn parse(body: &str) -> LeadForm {
        serde_html_form::from_str(body).expect("parse form")
    }

    #[test]
    fn repeated_contact_methods_are_collected() {
        let form = parse(
            "business_name=City+Brew+Coffee&industry=Bar%2FRestaurant%2FBrewery\
             &interest_level=Warm&contact_status=Proposal+Sent\
             &contact_methods=email&contact_methods=phone&last_contact_date=04%2F10%2F25",
        );

        let payload = LeadPayload::try_from(form).expect("valid");
        assert_eq!(
            payload.contact_methods,
            vec![ContactMethod::Email, ContactMethod::Phone]
        );
        assert_eq!(payload.interest_level, InterestLevel::Warm);
        assert_eq!(payload.contact_status, ContactStatus::ProposalSent);
        assert_eq!(payload.last_contact_date.as_deref(), Some("04/10/25"));
    }

    #[test]
    fn malformed_date_keeps_previous_value() {
        let form = parse("business_name=Acme&last_contact_date=4%2F1%2F2025");
        let payload = LeadPayload::try_from(form).expect("valid");
        assert!(payload.last_contact_date.is_none());

        let details = payload.into_details("03/15/25".to_string(), Vec::new(), stamp());
        assert_eq!(details.last_contact_date, "03/15/25");
    }

    #[test]
    fn date_picker_values_are_converted() {
        let form = parse("business_name=Acme&last_contact_date=2025-04-18");
        let payload = LeadPayload::try_from(form).expect("valid");
        assert_eq!(payload.last_contact_date.as_deref(), Some("04/18/25"));
    }

    #[test]
    fn typed_note_is_prepended() {
        let form = parse("business_name=Acme&current_note=++Called+back++");
        let existing = Note::new("Older", stamp()).expect("note");

        let details = LeadPayload::try_from(form)
            .expect("valid")
            .into_details("04/01/25".to_string(), vec![existing], stamp());

        assert_eq!(details.notes.len(), 2);
        assert_eq!(details.notes[0].content, "Called back");
        assert_eq!(details.notes[1].content, "Older");
    }

    #[test]
    fn blank_business_name_is_rejected() {
        let form = parse("business_name=+++");
        assert!(matches!(
            LeadPayload::try_from(form),
            Err(FormError::MissingBusinessName)
        ));
    }

    #[test]
    fn unknown_contact_method_is_rejected() {
        let form = parse("business_name=Acme&contact_methods=pager");
        assert!(matches!(
            LeadPayload::try_from(form),
            Err(FormError::InvalidContactMethod(method)) if method == "pager"
        ));
    }
}
