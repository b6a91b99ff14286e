//! Settings page: authentication mode and account summary.

use crate::dto::settings::SettingsPageData;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{LeadReader, LeadWriter, SavedListReader, SavedListWriter};
use crate::services::ServiceResult;
use crate::services::lead::open_book;

pub const AUTH_REQUIRED_STATUS: &str = "Users must log in to access the app.";
pub const AUTH_DISABLED_STATUS: &str = "Authentication is disabled. Anyone can access the app.";

pub fn load_settings<R>(
    repo: &R,
    user: &AuthenticatedUser,
    require_auth: bool,
) -> ServiceResult<SettingsPageData>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    let book = open_book(repo, user)?;

    Ok(SettingsPageData {
        require_auth,
        auth_status: if require_auth {
            AUTH_REQUIRED_STATUS
        } else {
            AUTH_DISABLED_STATUS
        },
        email: user.email.clone(),
        display_name: user.display_name.clone(),
        email_verified: user.email_verified,
        lead_count: book.leads().len(),
        list_count: book.lists().len(),
    })
}
