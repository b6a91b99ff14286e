use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{DisplayName, UserEmail};
use crate::forms::FormError;
use crate::services::auth::{ResetPasswordRequest, SignUpRequest};

#[derive(Deserialize, Validate)]
pub struct SignInForm {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct SignUpForm {
    #[validate(email)]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl TryFrom<SignUpForm> for SignUpRequest {
    type Error = FormError;

    fn try_from(form: SignUpForm) -> Result<Self, Self::Error> {
        form.validate().map_err(|_| FormError::InvalidEmail)?;

        let email = UserEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?;
        let display_name = match form.display_name.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => Some(DisplayName::new(name).map_err(|_| FormError::InvalidDisplayName)?),
        };

        Ok(SignUpRequest {
            email,
            password: form.password,
            confirm_password: form.confirm_password,
            display_name,
        })
    }
}

#[derive(Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl TryFrom<ForgotPasswordForm> for UserEmail {
    type Error = FormError;

    fn try_from(form: ForgotPasswordForm) -> Result<Self, Self::Error> {
        UserEmail::new(form.email).map_err(|_| FormError::InvalidEmail)
    }
}

#[derive(Deserialize)]
pub struct ResetPasswordForm {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

impl From<ResetPasswordForm> for ResetPasswordRequest {
    fn from(form: ResetPasswordForm) -> Self {
        Self {
            token: form.token,
            password: form.password,
            confirm_password: form.confirm_password,
        }
    }
}
