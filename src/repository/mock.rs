//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::lead::{Lead, LeadPatch, NewLead, UpdateLead};
use crate::domain::saved_list::{NewSavedList, SavedList};
use crate::domain::types::{LeadId, SavedListId, UserEmail, UserUid};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    LeadReader, LeadWriter, SavedListReader, SavedListWriter, UserReader, UserWriter,
};

mock! {
    pub Repository {}

    impl LeadReader for Repository {
        fn get_lead_by_id(&self, id: LeadId, owner: &UserUid) -> RepositoryResult<Option<Lead>>;
        fn list_leads(&self, owner: &UserUid) -> RepositoryResult<Vec<Lead>>;
        fn list_leads_by_industry(
            &self,
            owner: &UserUid,
            industry: &str,
        ) -> RepositoryResult<Vec<Lead>>;
    }

    impl LeadWriter for Repository {
        fn create_lead(&self, new_lead: &NewLead) -> RepositoryResult<Lead>;
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

    impl SavedListReader for Repository {
        fn list_saved_lists(&self, owner: &UserUid) -> RepositoryResult<Vec<SavedList>>;
    }

    impl SavedListWriter for Repository {
        fn create_saved_list(&self, new_list: &NewSavedList) -> RepositoryResult<SavedList>;
        fn seed_saved_lists(
            &self,
            owner: &UserUid,
            defaults: &[NewSavedList],
        ) -> RepositoryResult<Vec<SavedList>>;
        fn delete_saved_list(&self, id: SavedListId, owner: &UserUid) -> RepositoryResult<()>;
    }

    impl UserReader for Repository {
        fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>>;
        fn get_user_by_uid(&self, uid: &UserUid) -> RepositoryResult<Option<User>>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn update_password(&self, uid: &UserUid, password_hash: &str) -> RepositoryResult<()>;
        fn mark_email_verified(&self, uid: &UserUid) -> RepositoryResult<()>;
        fn record_login(&self, uid: &UserUid) -> RepositoryResult<()>;
    }
}
