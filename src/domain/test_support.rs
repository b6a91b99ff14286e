//! Fixture leads shared by the domain unit tests.

use chrono::NaiveDateTime;

use crate::domain::lead::{Lead, Note, Socials};
use crate::domain::types::{
    BusinessName, ContactMethod, ContactStatus, InterestLevel, LeadId, UserUid,
};

struct Row {
    id: i32,
    name: &'static str,
    person: &'static str,
    website: Option<&'static str>,
    interest: InterestLevel,
    industry: &'static str,
    last_contact: &'static str,
    status: ContactStatus,
    methods: &'static [ContactMethod],
}

pub fn lead(
    id: i32,
    name: &str,
    interest: InterestLevel,
    industry: &str,
    last_contact: &str,
) -> Lead {
    Lead {
        id: LeadId::new(id).expect("positive id"),
        owner_uid: UserUid::new("demo-user").expect("uid"),
        business_name: BusinessName::new(name).expect("business name"),
        contact_person: None,
        phone: None,
        email: None,
        website: None,
        socials: Socials::default(),
        has_website: false,
        interest_level: interest,
        industry: industry.to_string(),
        last_contact_date: last_contact.to_string(),
        contact_status: ContactStatus::NotContacted,
        contact_methods: Vec::new(),
        notes: Vec::new(),
        created_at: NaiveDateTime::default(),
        updated_at: NaiveDateTime::default(),
    }
}

/// Six leads spread over four industries, one of them a law firm.
pub fn sample_leads() -> Vec<Lead> {
    use ContactMethod::*;

    let rows = [
        Row {
            id: 1,
            name: "Green Thumb Landscaping",
            person: "John Smith",
            website: Some("https://greenthumb.com"),
            interest: InterestLevel::Hot,
            industry: "Landscaping",
            last_contact: "04/15/25",
            status: ContactStatus::InDiscussion,
            methods: &[Phone, Email],
        },
        Row {
            id: 2,
            name: "City Brew Coffee",
            person: "Lisa Johnson",
            website: Some("https://citybrew.com"),
            interest: InterestLevel::Warm,
            industry: "Bar/Restaurant/Brewery",
            last_contact: "04/10/25",
            status: ContactStatus::ProposalSent,
            methods: &[Email],
        },
        Row {
            id: 3,
            name: "Johnson & Partners Law",
            person: "Robert Johnson",
            website: None,
            interest: InterestLevel::Hot,
            industry: "Law Firm",
            last_contact: "04/18/25",
            status: ContactStatus::InDiscussion,
            methods: &[Phone],
        },
        Row {
            id: 4,
            name: "QuickFix Plumbing",
            person: "Mike Wilson",
            website: Some("https://quickfixplumbing.com"),
            interest: InterestLevel::Inactive,
            industry: "Plumbing",
            last_contact: "04/05/25",
            status: ContactStatus::InitialOutreach,
            methods: &[Email, Phone],
        },
        Row {
            id: 5,
            name: "Fresh Eats Deli",
            person: "Sarah Brown",
            website: Some("https://fresheats.com"),
            interest: InterestLevel::Converted,
            industry: "Bar/Restaurant/Brewery",
            last_contact: "04/12/25",
            status: ContactStatus::Maintenance,
            methods: &[Message],
        },
        Row {
            id: 6,
            name: "Mountain View Landscaping",
            person: "Thomas Reed",
            website: None,
            interest: InterestLevel::Warm,
            industry: "Landscaping",
            last_contact: "04/20/25",
            status: ContactStatus::InitialOutreach,
            methods: &[],
        },
    ];

    rows.into_iter()
        .map(|row| {
            let mut lead = lead(
                row.id,
                row.name,
                row.interest,
                row.industry,
                row.last_contact,
            );
            lead.contact_person = Some(row.person.to_string());
            lead.website = row.website.map(str::to_string);
            lead.has_website = row.website.is_some();
            lead.contact_status = row.status;
            lead.contact_methods = row.methods.to_vec();
            lead.notes = vec![Note {
                content: format!("First call with {}.", row.person),
                date: row.last_contact.to_string(),
                time: "9:00 AM".to_string(),
                timestamp: format!("{} 9:00 AM", row.last_contact),
            }];
            lead
        })
        .collect()
}
