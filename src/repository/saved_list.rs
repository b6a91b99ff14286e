//! Repository implementation for saved lists.

use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::{
        saved_list::{NewSavedList, SavedList},
        types::{SavedListId, UserUid},
    },
    models::saved_list::{NewSavedList as DbNewSavedList, SavedList as DbSavedList},
    repository::{
        DieselRepository, SavedListReader, SavedListWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl SavedListReader for DieselRepository {
    fn list_saved_lists(&self, owner: &UserUid) -> RepositoryResult<Vec<SavedList>> {
        use crate::schema::saved_lists;

        let mut conn = self.conn()?;
        saved_lists::table
            .filter(saved_lists::owner_uid.eq(owner.as_str()))
            .order(saved_lists::id.asc())
            .load::<DbSavedList>(&mut conn)?
            .into_iter()
            .map(|row| SavedList::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl SavedListWriter for DieselRepository {
    fn create_saved_list(&self, new_list: &NewSavedList) -> RepositoryResult<SavedList> {
        use crate::schema::saved_lists;

        let mut conn = self.conn()?;
        let insertable = DbNewSavedList::from_domain(new_list, Utc::now().naive_utc());
        let row = diesel::insert_into(saved_lists::table)
            .values(&insertable)
            .get_result::<DbSavedList>(&mut conn)?;

        SavedList::try_from(row).map_err(RepositoryError::from)
    }

    fn seed_saved_lists(
        &self,
        owner: &UserUid,
        defaults: &[NewSavedList],
    ) -> RepositoryResult<Vec<SavedList>> {
        use crate::schema::saved_lists;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let insertables: Vec<DbNewSavedList> = defaults
            .iter()
            .map(|list| DbNewSavedList::from_domain(list, now))
            .collect();

        // IMMEDIATE takes the write lock up front, so concurrent first loads
        // see each other's seed.
        let rows = conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
            let existing: i64 = saved_lists::table
                .filter(saved_lists::owner_uid.eq(owner.as_str()))
                .count()
                .get_result(conn)?;

            if existing == 0 && !insertables.is_empty() {
                diesel::insert_into(saved_lists::table)
                    .values(&insertables)
                    .execute(conn)?;
            }

            saved_lists::table
                .filter(saved_lists::owner_uid.eq(owner.as_str()))
                .order(saved_lists::id.asc())
                .load::<DbSavedList>(conn)
        })?;

        rows.into_iter()
            .map(|row| SavedList::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn delete_saved_list(&self, id: SavedListId, owner: &UserUid) -> RepositoryResult<()> {
        use crate::schema::saved_lists;

        let mut conn = self.conn()?;
        let affected = diesel::delete(
            saved_lists::table
                .filter(saved_lists::id.eq(id.get()))
                .filter(saved_lists::owner_uid.eq(owner.as_str())),
        )
        .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
