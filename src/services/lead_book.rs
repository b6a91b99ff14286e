//! Write-through mutation handlers over one user's leads and saved lists.
//!
//! A [`LeadBook`] holds the canonical collections loaded for a request. Every
//! handler performs the store write first and patches the in-memory
//! collection only once the write succeeded, so a failed write leaves the
//! book exactly as it was.

use crate::domain::datetime::{Timestamp, now_timestamp, today_display};
use crate::domain::lead::{Lead, LeadDetails, LeadPatch, NewLead, Note, Socials, UpdateLead};
use crate::domain::saved_list::{ListCriteria, NewSavedList, SavedList};
use crate::domain::types::{
    BusinessName, ContactMethod, ContactStatus, InterestLevel, LeadId, ListName, SavedListId,
    UserUid,
};
use crate::domain::view::{ViewState, unique_industries};
use crate::repository::{LeadReader, LeadWriter, SavedListReader, SavedListWriter};
use crate::services::{ServiceError, ServiceResult};

/// Outcome of the confirmation step guarding destructive actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    /// Only an explicit `yes` confirms.
    pub fn from_answer(answer: Option<&str>) -> Self {
        match answer.map(str::trim) {
            Some(answer) if answer.eq_ignore_ascii_case("yes") => Confirmation::Confirmed,
            _ => Confirmation::Declined,
        }
    }
}

pub struct LeadBook<'r, R: ?Sized> {
    repo: &'r R,
    owner: UserUid,
    leads: Vec<Lead>,
    lists: Vec<SavedList>,
}

impl<'r, R> LeadBook<'r, R>
where
    R: LeadReader + LeadWriter + SavedListReader + SavedListWriter + ?Sized,
{
    /// Loads the owner's collections, creating the default lists for an
    /// account that has none.
    pub fn load(repo: &'r R, owner: UserUid) -> ServiceResult<Self> {
        let leads = repo.list_leads(&owner).map_err(|err| {
            log::error!("Failed to load leads for {owner}: {err}");
            err
        })?;

        let mut lists = repo.list_saved_lists(&owner).map_err(|err| {
            log::error!("Failed to load saved lists for {owner}: {err}");
            err
        })?;

        if lists.is_empty() {
            lists = repo
                .seed_saved_lists(&owner, &NewSavedList::defaults(&owner))
                .map_err(|err| {
                    log::error!("Failed to create default lists for {owner}: {err}");
                    err
                })?;
        }

        Ok(Self {
            repo,
            owner,
            leads,
            lists,
        })
    }

    pub fn owner(&self) -> &UserUid {
        &self.owner
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn lists(&self) -> &[SavedList] {
        &self.lists
    }

    pub fn industries(&self) -> Vec<String> {
        unique_industries(&self.leads)
    }

    pub fn lead(&self, id: LeadId) -> ServiceResult<&Lead> {
        self.leads
            .iter()
            .find(|lead| lead.id == id)
            .ok_or(ServiceError::NotFound)
    }

    fn position(&self, id: LeadId) -> ServiceResult<usize> {
        self.leads
            .iter()
            .position(|lead| lead.id == id)
            .ok_or(ServiceError::NotFound)
    }

    fn patch(&mut self, id: LeadId, patch: LeadPatch) -> ServiceResult<()> {
        let index = self.position(id)?;

        self.repo
            .patch_lead(id, &self.owner, &patch)
            .map_err(|err| {
                log::error!("Failed to update lead {id}: {err}");
                err
            })?;

        patch.apply(&mut self.leads[index]);
        Ok(())
    }

    /// Turning a method on stamps today's date as the last contact.
    pub fn toggle_contact_method(&mut self, id: LeadId, method: ContactMethod) -> ServiceResult<()> {
        let lead = self.lead(id)?;

        let mut methods = lead.contact_methods.clone();
        let mut last_contact_date = lead.last_contact_date.clone();
        if let Some(index) = methods.iter().position(|m| *m == method) {
            methods.remove(index);
        } else {
            methods.push(method);
            last_contact_date = today_display();
        }

        self.patch(
            id,
            LeadPatch::ContactMethods {
                methods,
                last_contact_date,
            },
        )
    }

    pub fn update_interest_level(&mut self, id: LeadId, level: InterestLevel) -> ServiceResult<()> {
        self.patch(id, LeadPatch::InterestLevel(level))
    }

    pub fn update_contact_status(
        &mut self,
        id: LeadId,
        status: ContactStatus,
    ) -> ServiceResult<()> {
        self.patch(id, LeadPatch::ContactStatus(status))
    }

    pub fn add_lead(&mut self, details: LeadDetails) -> ServiceResult<LeadId> {
        let new_lead = NewLead::new(self.owner.clone(), details);

        let lead = self.repo.create_lead(&new_lead).map_err(|err| {
            log::error!("Failed to add lead: {err}");
            err
        })?;

        let id = lead.id;
        self.leads.push(lead);
        Ok(id)
    }

    pub fn edit_lead(&mut self, id: LeadId, details: LeadDetails) -> ServiceResult<()> {
        let index = self.position(id)?;
        let updates = UpdateLead::new(details);

        let lead = self
            .repo
            .update_lead(id, &self.owner, &updates)
            .map_err(|err| {
                log::error!("Failed to save lead {id}: {err}");
                err
            })?;

        self.leads[index] = lead;
        Ok(())
    }

    /// Returns `false` without touching the store when not confirmed.
    pub fn delete_lead(&mut self, id: LeadId, confirmation: Confirmation) -> ServiceResult<bool> {
        let index = self.position(id)?;
        if confirmation == Confirmation::Declined {
            return Ok(false);
        }

        self.repo.delete_lead(id, &self.owner).map_err(|err| {
            log::error!("Failed to delete lead {id}: {err}");
            err
        })?;

        self.leads.remove(index);
        Ok(true)
    }

    pub fn add_list(&mut self, name: ListName, criteria: ListCriteria) -> ServiceResult<SavedListId> {
        let new_list = NewSavedList::new(self.owner.clone(), name, criteria);

        let list = self.repo.create_saved_list(&new_list).map_err(|err| {
            log::error!("Failed to add list {}: {err}", new_list.name);
            err
        })?;

        let id = list.id;
        self.lists.push(list);
        Ok(id)
    }

    /// Removes a list and drops it from the selection in `view`.
    pub fn delete_list(&mut self, id: SavedListId, view: &mut ViewState) -> ServiceResult<()> {
        let index = self
            .lists
            .iter()
            .position(|list| list.id == id)
            .ok_or(ServiceError::NotFound)?;

        self.repo.delete_saved_list(id, &self.owner).map_err(|err| {
            log::error!("Failed to delete list {id}: {err}");
            err
        })?;

        let removed = self.lists.remove(index);
        view.forget_list(removed.name.as_str());
        Ok(())
    }

    /// Prepends a note; blank content is ignored and reported as `false`.
    pub fn add_note(&mut self, id: LeadId, content: &str) -> ServiceResult<bool> {
        self.add_note_at(id, content, now_timestamp())
    }

    fn add_note_at(&mut self, id: LeadId, content: &str, stamp: Timestamp) -> ServiceResult<bool> {
        let lead = self.lead(id)?;
        let Some(note) = Note::new(content, stamp) else {
            return Ok(false);
        };

        let mut notes = Vec::with_capacity(lead.notes.len() + 1);
        notes.push(note);
        notes.extend(lead.notes.iter().cloned());

        self.patch(id, LeadPatch::Notes(notes))?;
        Ok(true)
    }

    pub fn delete_note(&mut self, id: LeadId, index: usize) -> ServiceResult<()> {
        let lead = self.lead(id)?;
        if index >= lead.notes.len() {
            return Err(ServiceError::NotFound);
        }

        let mut notes = lead.notes.clone();
        notes.remove(index);
        self.patch(id, LeadPatch::Notes(notes))
    }

    /// Makes a new industry visible by storing a placeholder lead for it.
    ///
    /// Returns `false` for blank or already known industries.
    pub fn add_industry(&mut self, industry: &str) -> ServiceResult<bool> {
        let industry = industry.trim();
        if industry.is_empty() || self.leads.iter().any(|lead| lead.industry == industry) {
            return Ok(false);
        }

        let business_name = BusinessName::new(format!("Sample {industry}"))?;
        let note = Note::new(
            &format!("Sample lead for the {industry} industry."),
            now_timestamp(),
        );
        let details = LeadDetails::new(
            business_name,
            None,
            None,
            None,
            None,
            Socials::default(),
            InterestLevel::Cold,
            industry.to_string(),
            today_display(),
            ContactStatus::NotContacted,
            Vec::new(),
            note.into_iter().collect(),
        );

        self.add_lead(details)?;
        Ok(true)
    }

    /// Bulk creates leads, then reloads the collection to pick up their ids.
    pub fn import(&mut self, rows: Vec<LeadDetails>) -> ServiceResult<usize> {
        let new_leads: Vec<NewLead> = rows
            .into_iter()
            .map(|details| NewLead::new(self.owner.clone(), details))
            .collect();

        let created = self.repo.create_leads(&new_leads).map_err(|err| {
            log::error!("Failed to import leads: {err}");
            err
        })?;

        self.leads = self.repo.list_leads(&self.owner).map_err(|err| {
            log::error!("Failed to reload leads after import: {err}");
            err
        })?;
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use chrono::NaiveDateTime;

    use super::*;
    use crate::domain::saved_list::{ListFilter, ValueMatch};
    use crate::domain::test_support::sample_leads;
    use crate::domain::view::ListSelection;
    use crate::repository::errors::{RepositoryError, RepositoryResult};

    /// In-memory store that can be switched into a failing mode.
    #[derive(Default)]
    struct FakeStore {
        leads: RefCell<Vec<Lead>>,
        lists: RefCell<Vec<SavedList>>,
        fail_writes: Cell<bool>,
        writes: Cell<usize>,
    }

    impl FakeStore {
        fn with_leads(leads: Vec<Lead>) -> Self {
            let store = Self::default();
            *store.leads.borrow_mut() = leads;
            store
        }

        fn write(&self) -> RepositoryResult<()> {
            self.writes.set(self.writes.get() + 1);
            if self.fail_writes.get() {
                return Err(RepositoryError::DatabaseError("disk I/O error".to_string()));
            }
            Ok(())
        }

        fn next_id(&self) -> i32 {
            self.leads
                .borrow()
                .iter()
                .map(|lead| lead.id.get())
                .max()
                .unwrap_or(0)
                + 1
        }

        fn materialize(&self, new_lead: &NewLead) -> Lead {
            let details = new_lead.details.clone();
            Lead {
                id: LeadId::new(self.next_id()).expect("id"),
                owner_uid: new_lead.owner_uid.clone(),
                business_name: details.business_name,
                contact_person: details.contact_person,
                phone: details.phone,
                email: details.email,
                website: details.website,
                socials: details.socials,
                has_website: new_lead.has_website,
                interest_level: details.interest_level,
                industry: details.industry,
                last_contact_date: details.last_contact_date,
                contact_status: details.contact_status,
                contact_methods: details.contact_methods,
                notes: details.notes,
                created_at: NaiveDateTime::default(),
                updated_at: NaiveDateTime::default(),
            }
        }
    }

    impl LeadReader for FakeStore {
        fn get_lead_by_id(&self, id: LeadId, _owner: &UserUid) -> RepositoryResult<Option<Lead>> {
            Ok(self.leads.borrow().iter().find(|l| l.id == id).cloned())
        }

        fn list_leads(&self, _owner: &UserUid) -> RepositoryResult<Vec<Lead>> {
            Ok(self.leads.borrow().clone())
        }

        fn list_leads_by_industry(
            &self,
            _owner: &UserUid,
            industry: &str,
        ) -> RepositoryResult<Vec<Lead>> {
            Ok(self
                .leads
                .borrow()
                .iter()
                .filter(|l| l.industry == industry)
                .cloned()
                .collect())
        }
    }

    impl LeadWriter for FakeStore {
        fn create_lead(&self, new_lead: &NewLead) -> RepositoryResult<Lead> {
            self.write()?;
            let lead = self.materialize(new_lead);
            self.leads.borrow_mut().push(lead.clone());
            Ok(lead)
        }

        fn create_leads(&self, new_leads: &[NewLead]) -> RepositoryResult<usize> {
            self.write()?;
            for new_lead in new_leads {
                let lead = self.materialize(new_lead);
                self.leads.borrow_mut().push(lead);
            }
            Ok(new_leads.len())
        }

        fn update_lead(
            &self,
            id: LeadId,
            _owner: &UserUid,
            updates: &UpdateLead,
        ) -> RepositoryResult<Lead> {
            self.write()?;
            let mut leads = self.leads.borrow_mut();
            let lead = leads
                .iter_mut()
                .find(|l| l.id == id)
                .ok_or(RepositoryError::NotFound)?;
            let details = updates.details.clone();
            lead.business_name = details.business_name;
            lead.website = details.website;
            lead.has_website = updates.has_website;
            lead.industry = details.industry;
            lead.notes = details.notes;
            Ok(lead.clone())
        }

        fn patch_lead(
            &self,
            id: LeadId,
            _owner: &UserUid,
            patch: &LeadPatch,
        ) -> RepositoryResult<()> {
            self.write()?;
            let mut leads = self.leads.borrow_mut();
            let lead = leads
                .iter_mut()
                .find(|l| l.id == id)
                .ok_or(RepositoryError::NotFound)?;
            patch.apply(lead);
            Ok(())
        }

        fn delete_lead(&self, id: LeadId, _owner: &UserUid) -> RepositoryResult<()> {
            self.write()?;
            self.leads.borrow_mut().retain(|l| l.id != id);
            Ok(())
        }
    }

    impl SavedListReader for FakeStore {
        fn list_saved_lists(&self, _owner: &UserUid) -> RepositoryResult<Vec<SavedList>> {
            Ok(self.lists.borrow().clone())
        }
    }

    impl SavedListWriter for FakeStore {
        fn create_saved_list(&self, new_list: &NewSavedList) -> RepositoryResult<SavedList> {
            self.write()?;
            let id = self.lists.borrow().len() as i32 + 1;
            let list = SavedList {
                id: SavedListId::new(id).expect("id"),
                owner_uid: new_list.owner_uid.clone(),
                name: new_list.name.clone(),
                criteria: new_list.criteria.clone(),
                created_at: NaiveDateTime::default(),
            };
            self.lists.borrow_mut().push(list.clone());
            Ok(list)
        }

        fn seed_saved_lists(
            &self,
            owner: &UserUid,
            defaults: &[NewSavedList],
        ) -> RepositoryResult<Vec<SavedList>> {
            if self.lists.borrow().is_empty() {
                for default in defaults {
                    self.create_saved_list(default)?;
                }
            }
            self.list_saved_lists(owner)
        }

        fn delete_saved_list(&self, id: SavedListId, _owner: &UserUid) -> RepositoryResult<()> {
            self.write()?;
            self.lists.borrow_mut().retain(|l| l.id != id);
            Ok(())
        }
    }

    fn owner() -> UserUid {
        UserUid::new("demo-user").expect("uid")
    }

    fn id(value: i32) -> LeadId {
        LeadId::new(value).expect("id")
    }

    fn stamp(content: &str) -> Note {
        Note {
            content: content.to_string(),
            date: "04/01/25".to_string(),
            time: "9:00 AM".to_string(),
            timestamp: "04/01/25 9:00 AM".to_string(),
        }
    }

    #[test]
    fn load_seeds_default_lists_once() {
        let store = FakeStore::with_leads(sample_leads());

        let book = LeadBook::load(&store, owner()).expect("load");
        assert_eq!(book.lists().len(), 5);
        assert_eq!(book.leads().len(), 6);

        let book = LeadBook::load(&store, owner()).expect("reload");
        assert_eq!(book.lists().len(), 5);
    }

    #[test]
    fn toggling_method_on_stamps_today_and_off_keeps_date() {
        let store = FakeStore::with_leads(sample_leads());
        let mut book = LeadBook::load(&store, owner()).expect("load");
        let mountain_view = id(6);

        book.toggle_contact_method(mountain_view, ContactMethod::Instagram)
            .expect("toggle on");
        let lead = book.lead(mountain_view).expect("lead");
        assert_eq!(lead.contact_methods, vec![ContactMethod::Instagram]);
        let stamped = today_display();
        assert_eq!(lead.last_contact_date, stamped);

        book.toggle_contact_method(mountain_view, ContactMethod::Instagram)
            .expect("toggle off");
        let lead = book.lead(mountain_view).expect("lead");
        assert!(lead.contact_methods.is_empty());
        assert_eq!(lead.last_contact_date, stamped);

        let stored = store.get_lead_by_id(mountain_view, &owner()).expect("get");
        assert_eq!(stored.map(|l| l.last_contact_date), Some(stamped));
    }

    #[test]
    fn toggling_off_an_existing_method_keeps_original_date() {
        let store = FakeStore::with_leads(sample_leads());
        let mut book = LeadBook::load(&store, owner()).expect("load");

        book.toggle_contact_method(id(1), ContactMethod::Phone)
            .expect("toggle off");
        let lead = book.lead(id(1)).expect("lead");
        assert_eq!(lead.contact_methods, vec![ContactMethod::Email]);
        assert_eq!(lead.last_contact_date, "04/15/25");
    }

    #[test]
    fn failed_write_leaves_local_state_unchanged() {
        let store = FakeStore::with_leads(sample_leads());
        let mut book = LeadBook::load(&store, owner()).expect("load");
        store.fail_writes.set(true);

        let before = book.leads().to_vec();
        assert!(book.update_interest_level(id(2), InterestLevel::Hot).is_err());
        assert!(book.toggle_contact_method(id(2), ContactMethod::Phone).is_err());
        assert!(book.add_note(id(2), "Follow up").is_err());
        assert!(book.delete_lead(id(2), Confirmation::Confirmed).is_err());
        assert_eq!(book.leads(), before.as_slice());
    }

    #[test]
    fn inline_updates_patch_only_the_target() {
        let store = FakeStore::with_leads(sample_leads());
        let mut book = LeadBook::load(&store, owner()).expect("load");

        book.update_interest_level(id(4), InterestLevel::Warm)
            .expect("interest");
        book.update_contact_status(id(4), ContactStatus::FollowUp)
            .expect("status");

        let lead = book.lead(id(4)).expect("lead");
        assert_eq!(lead.interest_level, InterestLevel::Warm);
        assert_eq!(lead.contact_status, ContactStatus::FollowUp);
        assert_eq!(book.lead(id(5)).expect("lead").interest_level, InterestLevel::Converted);
    }

    #[test]
    fn unknown_lead_is_not_found() {
        let store = FakeStore::with_leads(sample_leads());
        let mut book = LeadBook::load(&store, owner()).expect("load");
        let writes = store.writes.get();

        assert!(matches!(
            book.update_interest_level(id(99), InterestLevel::Hot),
            Err(ServiceError::NotFound)
        ));
        assert_eq!(store.writes.get(), writes);
    }

    #[test]
    fn declined_delete_issues_no_store_call() {
        let store = FakeStore::with_leads(sample_leads());
        let mut book = LeadBook::load(&store, owner()).expect("load");
        let writes = store.writes.get();

        assert!(!book.delete_lead(id(3), Confirmation::Declined).expect("declined"));
        assert_eq!(store.writes.get(), writes);
        assert_eq!(book.leads().len(), 6);

        assert!(book.delete_lead(id(3), Confirmation::Confirmed).expect("deleted"));
        assert_eq!(book.leads().len(), 5);
        assert!(book.lead(id(3)).is_err());
    }

    #[test]
    fn confirmation_requires_explicit_yes() {
        assert_eq!(Confirmation::from_answer(Some("yes")), Confirmation::Confirmed);
        assert_eq!(Confirmation::from_answer(Some(" YES ")), Confirmation::Confirmed);
        assert_eq!(Confirmation::from_answer(Some("no")), Confirmation::Declined);
        assert_eq!(Confirmation::from_answer(None), Confirmation::Declined);
    }

    #[test]
    fn notes_are_prepended_and_blank_ones_ignored() {
        let store = FakeStore::with_leads(sample_leads());
        let mut book = LeadBook::load(&store, owner()).expect("load");
        let writes = store.writes.get();

        assert!(!book.add_note(id(1), "   ").expect("blank"));
        assert_eq!(store.writes.get(), writes);

        let now = stamp("ignored");
        let stamped = Timestamp {
            date: now.date,
            time: now.time,
            formatted: now.timestamp,
        };
        assert!(book.add_note_at(id(1), "  Sent proposal ", stamped).expect("note"));
        let notes = &book.lead(id(1)).expect("lead").notes;
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].content, "Sent proposal");
        assert_eq!(notes[0].timestamp, "04/01/25 9:00 AM");
    }

    #[test]
    fn deleting_note_preserves_order_of_the_rest() {
        let mut leads = sample_leads();
        leads[0].notes = vec![stamp("a"), stamp("b"), stamp("c"), stamp("d")];
        let store = FakeStore::with_leads(leads);
        let mut book = LeadBook::load(&store, owner()).expect("load");

        book.delete_note(id(1), 1).expect("delete");

        let contents: Vec<_> = book
            .lead(id(1))
            .expect("lead")
            .notes
            .iter()
            .map(|n| n.content.as_str())
            .collect();
        assert_eq!(contents, vec!["a", "c", "d"]);
        assert!(matches!(
            book.delete_note(id(1), 3),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn adding_and_editing_leads_derives_has_website() {
        let store = FakeStore::with_leads(Vec::new());
        let mut book = LeadBook::load(&store, owner()).expect("load");

        let details = |website: Option<&str>| {
            LeadDetails::new(
                BusinessName::new("Bright Smiles Dental").expect("name"),
                None,
                None,
                None,
                website.map(str::to_string),
                Socials::default(),
                InterestLevel::Cold,
                "Dental".to_string(),
                "04/01/25".to_string(),
                ContactStatus::NotContacted,
                Vec::new(),
                Vec::new(),
            )
        };

        let new_id = book.add_lead(details(None)).expect("add");
        assert!(!book.lead(new_id).expect("lead").has_website);

        book.edit_lead(new_id, details(Some("https://brightsmiles.com")))
            .expect("edit");
        assert!(book.lead(new_id).expect("lead").has_website);
    }

    #[test]
    fn deleting_selected_list_resets_selection() {
        let store = FakeStore::with_leads(sample_leads());
        let mut book = LeadBook::load(&store, owner()).expect("load");
        let list_id = book
            .add_list(
                ListName::new("Hot or Warm").expect("name"),
                ListCriteria::new(ListFilter::InterestLevel(ValueMatch::AnyOf(vec![
                    InterestLevel::Hot,
                    InterestLevel::Warm,
                ]))),
            )
            .expect("add list");
        let mut view = ViewState {
            list: ListSelection::from_label("Hot or Warm"),
            ..ViewState::default()
        };
        assert_eq!(view.derive(book.leads(), book.lists()).len(), 4);

        book.delete_list(list_id, &mut view).expect("delete list");

        assert_eq!(view.list, ListSelection::AllLeads);
        assert_eq!(book.lists().len(), 5);
    }

    #[test]
    fn adding_industry_creates_placeholder_lead_once() {
        let store = FakeStore::with_leads(sample_leads());
        let mut book = LeadBook::load(&store, owner()).expect("load");

        assert!(book.add_industry(" Dental ").expect("add"));
        assert!(!book.add_industry("Dental").expect("duplicate"));
        assert!(!book.add_industry("  ").expect("blank"));

        let placeholder = book.leads().last().expect("lead");
        assert_eq!(placeholder.business_name.as_str(), "Sample Dental");
        assert_eq!(placeholder.industry, "Dental");
        assert_eq!(
            placeholder.notes[0].content,
            "Sample lead for the Dental industry."
        );
        assert!(book.industries().contains(&"Dental".to_string()));
    }

    #[test]
    fn import_reloads_collection() {
        let store = FakeStore::with_leads(sample_leads());
        let mut book = LeadBook::load(&store, owner()).expect("load");
        let row = LeadDetails::new(
            BusinessName::new("Peak Fitness").expect("name"),
            None,
            None,
            None,
            None,
            Socials::default(),
            InterestLevel::Warm,
            "Fitness".to_string(),
            "04/02/25".to_string(),
            ContactStatus::NotContacted,
            Vec::new(),
            Vec::new(),
        );

        assert_eq!(book.import(vec![row]).expect("import"), 1);
        assert_eq!(book.leads().len(), 7);
        assert_eq!(book.leads()[6].id.get(), 7);
    }
}
