//! Diesel models for the `saved_lists` table.
//!
//! Only the data describing a list's filter is stored. `filter_value` holds
//! the single criterion as text (`"true"`/`"false"` for `hasWebsite`), and
//! the array columns hold JSON string arrays.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::saved_list::{
    FilterType, ListCriteria, ListFilter, NewSavedList as DomainNewSavedList,
    SavedList as DomainSavedList, ValueMatch,
};
use crate::domain::types::{
    ContactStatus, InterestLevel, ListName, SavedListId, TypeConstraintError, UserUid,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::saved_lists)]
/// Diesel model for [`crate::domain::saved_list::SavedList`].
pub struct SavedList {
    pub id: i32,
    pub owner_uid: String,
    pub name: String,
    pub filter_type: String,
    pub filter_value: Option<String>,
    pub filter_values: String,
    pub exclude_interest_levels: String,
    pub exclude_contact_statuses: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::saved_lists)]
/// Insertable form of [`SavedList`].
pub struct NewSavedList<'a> {
    pub owner_uid: &'a str,
    pub name: &'a str,
    pub filter_type: String,
    pub filter_value: Option<String>,
    pub filter_values: String,
    pub exclude_interest_levels: String,
    pub exclude_contact_statuses: String,
    pub created_at: NaiveDateTime,
}

fn to_json<T: AsRef<str>>(values: &[T]) -> String {
    let values: Vec<&str> = values.iter().map(AsRef::as_ref).collect();
    serde_json::to_string(&values).unwrap_or_else(|_| "[]".to_string())
}

fn from_json(column: &str, raw: &str) -> Result<Vec<String>, TypeConstraintError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("{column}: {e}")))
}

/// Splits a filter into its stored `(value, values)` pair.
fn encode_filter(filter: &ListFilter) -> (Option<String>, Vec<String>) {
    fn split<T: Clone + Into<String>>(values: &ValueMatch<T>) -> (Option<String>, Vec<String>) {
        match values {
            ValueMatch::One(value) => (Some(value.clone().into()), Vec::new()),
            ValueMatch::AnyOf(values) => (None, values.iter().cloned().map(Into::into).collect()),
        }
    }

    match filter {
        ListFilter::InterestLevel(values) => split(values),
        ListFilter::ContactStatus(values) => split(values),
        ListFilter::Industry(values) => split(values),
        ListFilter::HasWebsite(flag) => (Some(flag.to_string()), Vec::new()),
        ListFilter::Multi | ListFilter::Unknown(_) => (None, Vec::new()),
    }
}

fn decode_filter(
    filter_type: FilterType,
    value: Option<String>,
    values: Vec<String>,
) -> ListFilter {
    fn parsed<T: From<String> + PartialEq>(value: Option<String>, values: Vec<String>) -> ValueMatch<T> {
        ValueMatch::from_stored(
            value.map(T::from),
            values.into_iter().map(T::from).collect(),
        )
    }

    match filter_type {
        FilterType::InterestLevel => ListFilter::InterestLevel(parsed(value, values)),
        FilterType::ContactStatus => ListFilter::ContactStatus(parsed(value, values)),
        FilterType::Industry => ListFilter::Industry(parsed(value, values)),
        FilterType::HasWebsite => ListFilter::HasWebsite(value.as_deref() == Some("true")),
        FilterType::Multi => ListFilter::Multi,
        FilterType::Other(kind) => ListFilter::Unknown(kind),
    }
}

impl TryFrom<SavedList> for DomainSavedList {
    type Error = TypeConstraintError;

    fn try_from(list: SavedList) -> Result<Self, Self::Error> {
        let values = from_json("filter_values", &list.filter_values)?;
        let filter = decode_filter(FilterType::from(list.filter_type), list.filter_value, values);
        let exclude_interest_levels =
            from_json("exclude_interest_levels", &list.exclude_interest_levels)?
                .into_iter()
                .map(InterestLevel::from)
                .collect();
        let exclude_contact_statuses =
            from_json("exclude_contact_statuses", &list.exclude_contact_statuses)?
                .into_iter()
                .map(ContactStatus::from)
                .collect();

        Ok(Self {
            id: SavedListId::try_from(list.id)?,
            owner_uid: UserUid::new(list.owner_uid)?,
            name: ListName::new(list.name)?,
            criteria: ListCriteria {
                filter,
                exclude_interest_levels,
                exclude_contact_statuses,
            },
            created_at: list.created_at,
        })
    }
}

impl<'a> NewSavedList<'a> {
    pub fn from_domain(list: &'a DomainNewSavedList, now: NaiveDateTime) -> Self {
        let criteria = &list.criteria;
        let (filter_value, filter_values) = encode_filter(&criteria.filter);
        Self {
            owner_uid: list.owner_uid.as_str(),
            name: list.name.as_str(),
            filter_type: criteria.filter.filter_type().into(),
            filter_value,
            filter_values: to_json(&filter_values),
            exclude_interest_levels: to_json(
                &criteria
                    .exclude_interest_levels
                    .iter()
                    .map(InterestLevel::as_str)
                    .collect::<Vec<_>>(),
            ),
            exclude_contact_statuses: to_json(
                &criteria
                    .exclude_contact_statuses
                    .iter()
                    .map(ContactStatus::as_str)
                    .collect::<Vec<_>>(),
            ),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(filter_type: &str, value: Option<&str>, values: &str) -> SavedList {
        SavedList {
            id: 1,
            owner_uid: "demo-user".to_string(),
            name: "Pipeline".to_string(),
            filter_type: filter_type.to_string(),
            filter_value: value.map(str::to_string),
            filter_values: values.to_string(),
            exclude_interest_levels: "[]".to_string(),
            exclude_contact_statuses: r#"["Lost"]"#.to_string(),
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn array_values_take_precedence() {
        let list =
            DomainSavedList::try_from(stored("interestLevel", Some("Cold"), r#"["Hot","Warm"]"#))
                .expect("valid list");
        assert_eq!(
            list.criteria.filter,
            ListFilter::InterestLevel(ValueMatch::AnyOf(vec![
                InterestLevel::Hot,
                InterestLevel::Warm
            ]))
        );
        assert_eq!(
            list.criteria.exclude_contact_statuses,
            vec![ContactStatus::Lost]
        );
    }

    #[test]
    fn has_website_reads_boolean_text() {
        let list = DomainSavedList::try_from(stored("hasWebsite", Some("false"), "[]"))
            .expect("valid list");
        assert_eq!(list.criteria.filter, ListFilter::HasWebsite(false));
    }

    #[test]
    fn unknown_filter_type_is_preserved() {
        let list =
            DomainSavedList::try_from(stored("priority", None, "")).expect("valid list");
        assert_eq!(
            list.criteria.filter,
            ListFilter::Unknown("priority".to_string())
        );
    }

    #[test]
    fn domain_list_into_insertable() {
        let owner = UserUid::new("demo-user").expect("uid");
        let domain = DomainNewSavedList::new(
            owner,
            ListName::new("Landscapers").expect("name"),
            ListCriteria::new(ListFilter::Industry(ValueMatch::AnyOf(vec![
                "Landscaping".to_string(),
                "Plumbing".to_string(),
            ])))
            .excluding(vec![InterestLevel::Inactive], Vec::new()),
        );
        let row = NewSavedList::from_domain(&domain, NaiveDateTime::default());
        assert_eq!(row.filter_type, "industry");
        assert_eq!(row.filter_value, None);
        assert_eq!(row.filter_values, r#"["Landscaping","Plumbing"]"#);
        assert_eq!(row.exclude_interest_levels, r#"["Inactive"]"#);
        assert_eq!(row.exclude_contact_statuses, "[]");
    }
}
