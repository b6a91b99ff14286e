use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{DisplayName, TypeConstraintError, UserEmail, UserId, UserUid};
use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
/// Diesel model for [`crate::domain::user::User`].
pub struct User {
    pub id: i32,
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub password_hash: String,
    pub email_verified: bool,
    pub created_at: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub uid: &'a str,
    pub email: &'a str,
    pub display_name: Option<&'a str>,
    pub password_hash: &'a str,
    pub email_verified: bool,
    pub created_at: NaiveDateTime,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::try_from(user.id)?,
            uid: UserUid::new(user.uid)?,
            email: UserEmail::new(user.email)?,
            display_name: user.display_name.map(DisplayName::new).transpose()?,
            password_hash: user.password_hash,
            email_verified: user.email_verified,
            created_at: user.created_at,
            last_login: user.last_login,
        })
    }
}

impl<'a> NewUser<'a> {
    pub fn from_domain(user: &'a DomainNewUser, now: NaiveDateTime) -> Self {
        Self {
            uid: user.uid.as_str(),
            email: user.email.as_str(),
            display_name: user.display_name.as_ref().map(DisplayName::as_str),
            password_hash: &user.password_hash,
            email_verified: false,
            created_at: now,
        }
    }
}
