//! Repository implementation for leads.

use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::{
        lead::{Lead, LeadPatch, NewLead, UpdateLead},
        types::{LeadId, UserUid},
    },
    models::lead::{
        Lead as DbLead, NewLead as DbNewLead, PatchLead as DbPatchLead,
        UpdateLead as DbUpdateLead,
    },
    repository::{
        DieselRepository, LeadReader, LeadWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

fn into_domain(rows: Vec<DbLead>) -> RepositoryResult<Vec<Lead>> {
    rows.into_iter()
        .map(|row| Lead::try_from(row).map_err(RepositoryError::from))
        .collect()
}

impl LeadReader for DieselRepository {
    fn get_lead_by_id(&self, id: LeadId, owner: &UserUid) -> RepositoryResult<Option<Lead>> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let lead = leads::table
            .filter(leads::id.eq(id.get()))
            .filter(leads::owner_uid.eq(owner.as_str()))
            .first::<DbLead>(&mut conn)
            .optional()?;

        lead.map(Lead::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_leads(&self, owner: &UserUid) -> RepositoryResult<Vec<Lead>> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let rows = leads::table
            .filter(leads::owner_uid.eq(owner.as_str()))
            .order(leads::id.asc())
            .load::<DbLead>(&mut conn)?;

        into_domain(rows)
    }

    fn list_leads_by_industry(
        &self,
        owner: &UserUid,
        industry: &str,
    ) -> RepositoryResult<Vec<Lead>> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let rows = leads::table
            .filter(leads::owner_uid.eq(owner.as_str()))
            .filter(leads::industry.eq(industry))
            .order(leads::id.asc())
            .load::<DbLead>(&mut conn)?;

        into_domain(rows)
    }
}

impl LeadWriter for DieselRepository {
    fn create_lead(&self, new_lead: &NewLead) -> RepositoryResult<Lead> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let insertable = DbNewLead::from_domain(new_lead, Utc::now().naive_utc());
        let row = diesel::insert_into(leads::table)
            .values(&insertable)
            .get_result::<DbLead>(&mut conn)?;

        Lead::try_from(row).map_err(RepositoryError::from)
    }

    fn create_leads(&self, new_leads: &[NewLead]) -> RepositoryResult<usize> {
        use crate::schema::leads;

        if new_leads.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let insertables: Vec<DbNewLead> = new_leads
            .iter()
            .map(|lead| DbNewLead::from_domain(lead, now))
            .collect();

        conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            diesel::insert_into(leads::table)
                .values(&insertables)
                .execute(conn)
        })
        .map_err(RepositoryError::from)
    }

    fn update_lead(
        &self,
        id: LeadId,
        owner: &UserUid,
        updates: &UpdateLead,
    ) -> RepositoryResult<Lead> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let changeset = DbUpdateLead::from_domain(updates, Utc::now().naive_utc());
        let row = diesel::update(
            leads::table
                .filter(leads::id.eq(id.get()))
                .filter(leads::owner_uid.eq(owner.as_str())),
        )
        .set(&changeset)
        .get_result::<DbLead>(&mut conn)?;

        Lead::try_from(row).map_err(RepositoryError::from)
    }

    fn patch_lead(&self, id: LeadId, owner: &UserUid, patch: &LeadPatch) -> RepositoryResult<()> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let changeset = DbPatchLead::from_domain(patch, Utc::now().naive_utc());
        let affected = diesel::update(
            leads::table
                .filter(leads::id.eq(id.get()))
                .filter(leads::owner_uid.eq(owner.as_str())),
        )
        .set(&changeset)
        .execute(&mut conn)?;

        match affected {
            0 => Err(RepositoryError::NotFound),
            _ => Ok(()),
        }
    }

    fn delete_lead(&self, id: LeadId, owner: &UserUid) -> RepositoryResult<()> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let affected = diesel::delete(
            leads::table
                .filter(leads::id.eq(id.get()))
                .filter(leads::owner_uid.eq(owner.as_str())),
        )
        .execute(&mut conn)?;

        match affected {
            0 => Err(RepositoryError::NotFound),
            _ => Ok(()),
        }
    }
}
