//! Storage contracts of the lead tracker and their Diesel implementation.
//!
//! Every read and write is scoped to the owning user's uid.

use crate::{
    db::{DbConnection, DbPool, get_connection},
    domain::{
        lead::{Lead, LeadPatch, NewLead, UpdateLead},
        saved_list::{NewSavedList, SavedList},
        types::{LeadId, SavedListId, UserEmail, UserUid},
        user::{NewUser, User},
    },
    repository::errors::RepositoryResult,
};

pub mod errors;
pub mod lead;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod saved_list;
pub mod user;

/// Diesel-backed repository shared by all request handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

pub trait LeadReader {
    fn get_lead_by_id(&self, id: LeadId, owner: &UserUid) -> RepositoryResult<Option<Lead>>;
    /// All leads of `owner` in insertion order.
    fn list_leads(&self, owner: &UserUid) -> RepositoryResult<Vec<Lead>>;
    fn list_leads_by_industry(
        &self,
        owner: &UserUid,
        industry: &str,
    ) -> RepositoryResult<Vec<Lead>>;
}

pub trait LeadWriter {
    fn create_lead(&self, new_lead: &NewLead) -> RepositoryResult<Lead>;
    /// Bulk insert used by the CSV import. Returns the number of rows.
    fn create_leads(&self, new_leads: &[NewLead]) -> RepositoryResult<usize>;
    fn update_lead(
        &self,
        id: LeadId,
        owner: &UserUid,
        updates: &UpdateLead,
    ) -> RepositoryResult<Lead>;
    fn patch_lead(&self, id: LeadId, owner: &UserUid, patch: &LeadPatch) -> RepositoryResult<()>;
    fn delete_lead(&self, id: LeadId, owner: &UserUid) -> RepositoryResult<()>;
}

pub trait SavedListReader {
    fn list_saved_lists(&self, owner: &UserUid) -> RepositoryResult<Vec<SavedList>>;
}

pub trait SavedListWriter {
    fn create_saved_list(&self, new_list: &NewSavedList) -> RepositoryResult<SavedList>;
    /// Inserts `defaults` only while `owner` still has no lists, as one
    /// atomic step. Returns the owner's lists afterwards.
    fn seed_saved_lists(
        &self,
        owner: &UserUid,
        defaults: &[NewSavedList],
    ) -> RepositoryResult<Vec<SavedList>>;
    fn delete_saved_list(&self, id: SavedListId, owner: &UserUid) -> RepositoryResult<()>;
}

pub trait UserReader {
    fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>>;
    fn get_user_by_uid(&self, uid: &UserUid) -> RepositoryResult<Option<User>>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_password(&self, uid: &UserUid, password_hash: &str) -> RepositoryResult<()>;
    fn mark_email_verified(&self, uid: &UserUid) -> RepositoryResult<()>;
    fn record_login(&self, uid: &UserUid) -> RepositoryResult<()>;
}
