use serde::Deserialize;

use crate::domain::saved_list::{FilterType, ListCriteria, ListFilter, ValueMatch};
use crate::domain::types::{ContactStatus, InterestLevel, ListName};
use crate::forms::FormError;

/// Fields of the "Create New List" dialog.
#[derive(Debug, Deserialize)]
pub struct AddListForm {
    pub name: String,
    pub filter_type: String,
    #[serde(default)]
    pub filter_value: Option<String>,
    #[serde(default)]
    pub filter_values: Vec<String>,
    #[serde(default)]
    pub exclude_interest_levels: Vec<String>,
    #[serde(default)]
    pub exclude_contact_statuses: Vec<String>,
}

pub struct AddListPayload {
    pub name: ListName,
    pub criteria: ListCriteria,
}

impl TryFrom<AddListForm> for AddListPayload {
    type Error = FormError;

    fn try_from(form: AddListForm) -> Result<Self, Self::Error> {
        let name = ListName::new(form.name).map_err(|_| FormError::MissingListName)?;

        let value = form
            .filter_value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let values: Vec<String> = form
            .filter_values
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();

        let filter = match FilterType::from(form.filter_type.as_str()) {
            FilterType::InterestLevel => ListFilter::InterestLevel(ValueMatch::from_stored(
                value.map(InterestLevel::from),
                values.into_iter().map(InterestLevel::from).collect(),
            )),
            FilterType::ContactStatus => ListFilter::ContactStatus(ValueMatch::from_stored(
                value.map(ContactStatus::from),
                values.into_iter().map(ContactStatus::from).collect(),
            )),
            FilterType::Industry => ListFilter::Industry(ValueMatch::from_stored(value, values)),
            FilterType::HasWebsite => ListFilter::HasWebsite(value.as_deref() == Some("true")),
            FilterType::Multi => ListFilter::Multi,
            FilterType::Other(kind) => return Err(FormError::InvalidFilterType(kind)),
        };

        let criteria = ListCriteria::new(filter).excluding(
            dedup(form.exclude_interest_levels.into_iter().map(InterestLevel::from)),
            dedup(form.exclude_contact_statuses.into_iter().map(ContactStatus::from)),
        );

        Ok(Self { name, criteria })
    }
}

fn dedup<T: PartialEq>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut unique = Vec::new();
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

#[derive(Deserialize)]
pub struct AddIndustryForm {
    pub industry: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(body: &str) -> Result<AddListPayload, FormError> {
        let form: AddListForm = serde_html_form::from_str(body).expect("parse form");
        AddListPayload::try_from(form)
    }

    #[test]
    fn has_website_value_is_a_boolean() {
        let with = payload("name=Sites&filter_type=hasWebsite&filter_value=true").expect("valid");
        assert_eq!(with.criteria.filter, ListFilter::HasWebsite(true));

        let without =
            payload("name=No+Sites&filter_type=hasWebsite&filter_value=false").expect("valid");
        assert_eq!(without.criteria.filter, ListFilter::HasWebsite(false));
    }

    #[test]
    fn multi_list_keeps_only_exclusions() {
        let list = payload(
            "name=Open&filter_type=multi&filter_value=Hot&filter_values=Warm\
             &exclude_contact_statuses=Lost&exclude_contact_statuses=Dormant\
             &exclude_interest_levels=Inactive",
        )
        .expect("valid");

        assert_eq!(list.criteria.filter, ListFilter::Multi);
        assert_eq!(
            list.criteria.exclude_contact_statuses,
            vec![ContactStatus::Lost, ContactStatus::Dormant]
        );
        assert_eq!(
            list.criteria.exclude_interest_levels,
            vec![InterestLevel::Inactive]
        );
    }

    #[test]
    fn several_values_build_an_any_of_match() {
        let list = payload(
            "name=Hospitality&filter_type=industry&filter_values=Bar%2FRestaurant%2FBrewery\
             &filter_values=Hotel",
        )
        .expect("valid");

        assert_eq!(
            list.criteria.filter,
            ListFilter::Industry(ValueMatch::AnyOf(vec![
                "Bar/Restaurant/Brewery".to_string(),
                "Hotel".to_string()
            ]))
        );
    }

    #[test]
    fn single_value_builds_an_equality_match() {
        let list =
            payload("name=Hot&filter_type=interestLevel&filter_value=Hot").expect("valid");
        assert_eq!(
            list.criteria.filter,
            ListFilter::InterestLevel(ValueMatch::One(InterestLevel::Hot))
        );
    }

    #[test]
    fn name_and_type_are_required() {
        assert!(matches!(
            payload("name=+&filter_type=multi"),
            Err(FormError::MissingListName)
        ));
        assert!(matches!(
            payload("name=X&filter_type=owner"),
            Err(FormError::InvalidFilterType(kind)) if kind == "owner"
        ));
    }
}
