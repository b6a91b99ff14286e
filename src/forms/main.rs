use std::io::Read;

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;

use crate::domain::datetime::is_display_date;
use crate::domain::lead::{LeadDetails, Socials};
use crate::domain::types::{BusinessName, ContactStatus, InterestLevel};
use crate::forms::FormError;

#[derive(MultipartForm)]
pub struct UploadLeadsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

impl UploadLeadsForm {
    /// Reads the uploaded file; `today` fills missing or malformed dates.
    pub fn parse(&mut self, today: &str) -> Result<Vec<LeadDetails>, FormError> {
        let mut content = Vec::new();
        self.csv
            .file
            .as_file_mut()
            .read_to_end(&mut content)
            .map_err(|err| FormError::InvalidCsv(err.to_string()))?;

        parse_leads_csv(content.as_slice(), today)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CsvLeadRow {
    business_name: String,
    contact_person: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    website: Option<String>,
    industry: String,
    interest_level: Option<String>,
    contact_status: Option<String>,
    last_contact_date: Option<String>,
    facebook: Option<String>,
    instagram: Option<String>,
    linkedin: Option<String>,
    gbp: Option<String>,
}

/// Parses lead rows from CSV with a header line; rows without a business
/// name are skipped.
pub fn parse_leads_csv<R: Read>(reader: R, today: &str) -> Result<Vec<LeadDetails>, FormError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut leads = Vec::new();
    for (line, row) in rdr.deserialize::<CsvLeadRow>().enumerate() {
        let row = row.map_err(|err| FormError::InvalidCsv(format!("row {}: {err}", line + 1)))?;

        let Ok(business_name) = BusinessName::new(row.business_name) else {
            log::info!("Skipping CSV row {} without a business name", line + 1);
            continue;
        };

        let last_contact_date = row
            .last_contact_date
            .filter(|date| is_display_date(date))
            .unwrap_or_else(|| today.to_string());

        leads.push(LeadDetails::new(
            business_name,
            row.contact_person,
            row.phone,
            row.email,
            row.website,
            Socials::new(row.facebook, row.instagram, row.linkedin, row.gbp),
            row.interest_level
                .filter(|level| !level.is_empty())
                .map(InterestLevel::from)
                .unwrap_or_default(),
            row.industry,
            last_contact_date,
            row.contact_status
                .filter(|status| !status.is_empty())
                .map(ContactStatus::from)
                .unwrap_or_default(),
            Vec::new(),
            Vec::new(),
        ));
    }

    Ok(leads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_map_onto_lead_details() {
        let data = "\
businessName,contactPerson,email,website,industry,interestLevel,contactStatus,lastContactDate,instagram
Peak Fitness, Dana Cole ,Dana@PeakFit.com,https://peakfit.com,Fitness,Hot,Follow Up,04/02/25,
,Nobody,,,,,,,
Corner Books,,,,Retail,,,2025-04-02,https://instagram.com/cornerbooks
";

        let leads = parse_leads_csv(data.as_bytes(), "04/21/25").expect("parse");

        assert_eq!(leads.len(), 2);
        let peak = &leads[0];
        assert_eq!(peak.business_name.as_str(), "Peak Fitness");
        assert_eq!(peak.contact_person.as_deref(), Some("Dana Cole"));
        assert_eq!(peak.email.as_deref(), Some("dana@peakfit.com"));
        assert_eq!(peak.interest_level, InterestLevel::Hot);
        assert_eq!(peak.contact_status, ContactStatus::FollowUp);
        assert_eq!(peak.last_contact_date, "04/02/25");
        assert!(peak.has_website());

        let books = &leads[1];
        assert_eq!(books.interest_level, InterestLevel::Cold);
        assert_eq!(books.contact_status, ContactStatus::NotContacted);
        assert_eq!(books.last_contact_date, "04/21/25");
        assert_eq!(
            books.socials.instagram.as_deref(),
            Some("https://instagram.com/cornerbooks")
        );
    }

    #[test]
    fn missing_columns_default() {
        let leads = parse_leads_csv("businessName\nSolo Shop\n".as_bytes(), "01/02/25")
            .expect("parse");
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].industry, "");
        assert!(leads[0].contact_methods.is_empty());
    }
}
