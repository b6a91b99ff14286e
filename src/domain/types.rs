//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! normalized/validated email) so that once a value reaches the domain layer it
//! can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(LeadId, "Unique identifier for a lead.");
id_newtype!(SavedListId, "Unique identifier for a saved list.");
id_newtype!(UserId, "Internal identifier for a registered user.");

/// Lower-cased and validated email address of an account.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserEmail(String);

impl UserEmail {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for UserEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for UserEmail {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for UserEmail {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserEmail> for String {
    fn from(value: UserEmail) -> Self {
        value.0
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(
    BusinessName,
    "Lead business name wrapper enforcing non-empty values."
);

non_empty_string_newtype!(
    ListName,
    "Saved list name wrapper enforcing trimmed, non-empty values."
);

non_empty_string_newtype!(
    DisplayName,
    "Optional account display name enforcing non-empty values."
);

non_empty_string_newtype!(
    UserUid,
    "Opaque account identifier that owns leads and saved lists."
);

impl UserUid {
    /// Generates a fresh random identifier for a new account.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Ordinal sales-funnel heat of a lead.
///
/// Unknown stored values are preserved in [`InterestLevel::Other`] and rank
/// below every named level.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum InterestLevel {
    Inactive,
    #[default]
    Cold,
    Warm,
    Hot,
    Converted,
    Other(String),
}

impl InterestLevel {
    /// Named levels in funnel order.
    pub const ALL: [InterestLevel; 5] = [
        InterestLevel::Inactive,
        InterestLevel::Cold,
        InterestLevel::Warm,
        InterestLevel::Hot,
        InterestLevel::Converted,
    ];

    /// Sort weight of the level; unknown values rank `-1`.
    pub fn rank(&self) -> i8 {
        match self {
            InterestLevel::Inactive => 0,
            InterestLevel::Cold => 1,
            InterestLevel::Warm => 2,
            InterestLevel::Hot => 3,
            InterestLevel::Converted => 4,
            InterestLevel::Other(_) => -1,
        }
    }

    /// Background colour of the inline interest selector.
    pub fn color(&self) -> &'static str {
        match self {
            InterestLevel::Hot => "rgb(249, 115, 22)",
            InterestLevel::Warm => "rgb(234, 179, 8)",
            InterestLevel::Cold => "rgb(59, 130, 246)",
            InterestLevel::Converted => "rgb(22, 163, 74)",
            InterestLevel::Inactive | InterestLevel::Other(_) => "rgb(30, 64, 175)",
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            InterestLevel::Inactive => "Inactive",
            InterestLevel::Cold => "Cold",
            InterestLevel::Warm => "Warm",
            InterestLevel::Hot => "Hot",
            InterestLevel::Converted => "Converted",
            InterestLevel::Other(s) => s,
        }
    }
}

impl Display for InterestLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for InterestLevel {
    fn from(s: &str) -> Self {
        match s {
            "Inactive" => InterestLevel::Inactive,
            "Cold" => InterestLevel::Cold,
            "Warm" => InterestLevel::Warm,
            "Hot" => InterestLevel::Hot,
            "Converted" => InterestLevel::Converted,
            _ => InterestLevel::Other(s.to_string()),
        }
    }
}

impl From<String> for InterestLevel {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<InterestLevel> for String {
    fn from(value: InterestLevel) -> Self {
        value.as_str().to_string()
    }
}

/// Outreach pipeline stage of a lead.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum ContactStatus {
    #[default]
    NotContacted,
    InitialOutreach,
    FollowUp,
    InDiscussion,
    ProposalSent,
    Negotiating,
    UnderReview,
    ContractSent,
    FutureOpportunity,
    Onboarding,
    Maintenance,
    Dormant,
    Lost,
    Other(String),
}

impl ContactStatus {
    /// Named stages in the order they are offered in the UI.
    pub const ALL: [ContactStatus; 13] = [
        ContactStatus::NotContacted,
        ContactStatus::InitialOutreach,
        ContactStatus::FollowUp,
        ContactStatus::InDiscussion,
        ContactStatus::ProposalSent,
        ContactStatus::Negotiating,
        ContactStatus::UnderReview,
        ContactStatus::ContractSent,
        ContactStatus::FutureOpportunity,
        ContactStatus::Onboarding,
        ContactStatus::Maintenance,
        ContactStatus::Dormant,
        ContactStatus::Lost,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ContactStatus::NotContacted => "Not Contacted",
            ContactStatus::InitialOutreach => "Initial Outreach",
            ContactStatus::FollowUp => "Follow Up",
            ContactStatus::InDiscussion => "In Discussion",
            ContactStatus::ProposalSent => "Proposal Sent",
            ContactStatus::Negotiating => "Negotiating",
            ContactStatus::UnderReview => "Under Review",
            ContactStatus::ContractSent => "Contract Sent",
            ContactStatus::FutureOpportunity => "Future Opportunity",
            ContactStatus::Onboarding => "Onboarding",
            ContactStatus::Maintenance => "Maintenance",
            ContactStatus::Dormant => "Dormant",
            ContactStatus::Lost => "Lost",
            ContactStatus::Other(s) => s,
        }
    }

    /// CSS colour used by the status badge.
    pub fn color(&self) -> &'static str {
        match self {
            ContactStatus::NotContacted => "rgb(71, 85, 105)",
            ContactStatus::InitialOutreach => "rgb(100, 116, 139)",
            ContactStatus::FollowUp => "rgb(139, 92, 246)",
            ContactStatus::InDiscussion => "rgb(234, 179, 8)",
            ContactStatus::ProposalSent => "rgb(217, 70, 239)",
            ContactStatus::Negotiating => "rgb(6, 182, 212)",
            ContactStatus::UnderReview => "rgb(59, 130, 246)",
            ContactStatus::ContractSent => "rgb(37, 99, 235)",
            ContactStatus::FutureOpportunity => "rgb(251, 146, 60)",
            ContactStatus::Onboarding => "rgb(52, 211, 153)",
            ContactStatus::Maintenance => "rgb(22, 163, 74)",
            ContactStatus::Dormant => "rgb(107, 114, 128)",
            ContactStatus::Lost => "rgb(220, 38, 38)",
            ContactStatus::Other(_) => "rgb(71, 85, 105)",
        }
    }
}

impl Display for ContactStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for ContactStatus {
    fn from(s: &str) -> Self {
        ContactStatus::ALL
            .iter()
            .find(|status| status.as_str() == s)
            .cloned()
            .unwrap_or_else(|| ContactStatus::Other(s.to_string()))
    }
}

impl From<String> for ContactStatus {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<ContactStatus> for String {
    fn from(value: ContactStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Channel through which a lead has been contacted.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    Phone,
    Message,
    Email,
    Facebook,
    Instagram,
}

impl ContactMethod {
    pub const ALL: [ContactMethod; 5] = [
        ContactMethod::Phone,
        ContactMethod::Message,
        ContactMethod::Email,
        ContactMethod::Facebook,
        ContactMethod::Instagram,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactMethod::Phone => "phone",
            ContactMethod::Message => "message",
            ContactMethod::Email => "email",
            ContactMethod::Facebook => "facebook",
            ContactMethod::Instagram => "instagram",
        }
    }
}

impl Display for ContactMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContactMethod {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContactMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s.trim())
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("contact method {s}")))
    }
}
