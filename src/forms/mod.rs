//! Form definitions backing the lead tracker routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod auth;
pub mod lead;
pub mod list;
pub mod main;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Business name is required.")]
    MissingBusinessName,

    #[error("List name is required.")]
    MissingListName,

    #[error("Unknown contact method: {0}")]
    InvalidContactMethod(String),

    #[error("Unknown list filter type: {0}")]
    InvalidFilterType(String),

    #[error("Display name cannot be blank.")]
    InvalidDisplayName,

    #[error("Could not read the uploaded file: {0}")]
    InvalidCsv(String),
}
