pub mod api;
pub mod auth;
pub mod errors;
pub mod lead;
pub mod lead_book;
pub mod list;
pub mod main;
pub mod settings;

pub use errors::{ServiceError, ServiceResult};
