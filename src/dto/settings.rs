//! DTOs used by the settings page.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SettingsPageData {
    pub require_auth: bool,
    /// Sentence describing the current authentication mode.
    pub auth_status: &'static str,
    pub email: String,
    pub display_name: Option<String>,
    pub email_verified: bool,
    pub lead_count: usize,
    pub list_count: usize,
}
