//! Contact request handlers.
//!
//! # Responsibility
//! - Home, search, single-contact and form views.
//! - Create with name validation; update and delete without validation.
//!
//! # Invariants
//! - Create rejects names outside 1..=100 characters and exact duplicates
//!   (case-sensitive) of an existing contact name.
//! - Update deliberately skips the create-time name rules.
//! - A rejected create re-renders an empty form; entered values are dropped.

use super::outcome::{GroupSummary, Outcome, Page, RequestContext};
use super::ServiceResult;
use crate::model::contact::{ContactId, NewContact};
use crate::repo::contact_repo::ContactRepository;
use crate::repo::group_repo::GroupRepository;
use crate::repo::RepoResult;
use log::info;

pub const NAME_LENGTH_ERROR: &str = "Name must be between 1 and 100 characters.";
pub const DUPLICATE_NAME_ERROR: &str = "You already have this person in your contacts";
pub const CONTACT_ADDED: &str = "Contact added!";
pub const CONTACT_UPDATED: &str = "This contact has been updated.";
pub const CONTACT_DELETED: &str = "The contact has been deleted.";

/// Contact use-case handlers over gateway implementations.
pub struct ContactService<C: ContactRepository, G: GroupRepository> {
    contacts: C,
    groups: G,
}

impl<C: ContactRepository, G: GroupRepository> ContactService<C, G> {
    pub fn new(contacts: C, groups: G) -> Self {
        Self { contacts, groups }
    }

    /// `GET /home`: every group with its empty flag, and every contact.
    pub fn home(&self) -> ServiceResult<Outcome> {
        let groups = self
            .groups
            .list_groups()?
            .into_iter()
            .map(|group| -> RepoResult<GroupSummary> {
                let is_empty = self.groups.is_group_empty(group.id)?;
                Ok(GroupSummary { group, is_empty })
            })
            .collect::<RepoResult<Vec<_>>>()?;
        let contacts = self.contacts.list_contacts()?;

        Ok(Outcome::Render(Page::Home { groups, contacts }))
    }

    /// `GET /search`.
    pub fn search(&self, query: Option<&str>) -> ServiceResult<Outcome> {
        let results = self.contacts.search_contacts(query)?;
        Ok(Outcome::Render(Page::Search {
            query: query.map(str::to_string),
            results,
        }))
    }

    /// `GET /new`.
    pub fn new_form(&self) -> Outcome {
        Outcome::Render(Page::NewContact)
    }

    /// `POST /home`: validates and inserts one contact.
    pub fn create(&self, ctx: &mut RequestContext, fields: NewContact) -> ServiceResult<Outcome> {
        if let Some(message) = self.name_error(&fields)? {
            info!("event=contact_create module=service status=rejected reason=\"{message}\"");
            ctx.set_error(message);
            return Ok(Outcome::Render(Page::NewContact));
        }

        let id = self.contacts.create_from(&fields)?;
        info!("event=contact_create module=service status=ok contact_id={id}");
        ctx.set_success(CONTACT_ADDED);
        Ok(Outcome::redirect("/home"))
    }

    /// Returns the create-time validation message for `fields`, if any.
    ///
    /// Uniqueness is checked against the full contact list with exact string
    /// equality, so names differing only in case are distinct.
    pub fn name_error(&self, fields: &NewContact) -> ServiceResult<Option<&'static str>> {
        if !fields.has_valid_name_length() {
            return Ok(Some(NAME_LENGTH_ERROR));
        }

        let taken = self
            .contacts
            .list_contacts()?
            .iter()
            .any(|contact| contact.name == fields.name);
        if taken {
            return Ok(Some(DUPLICATE_NAME_ERROR));
        }

        Ok(None)
    }

    /// `GET /home/{id}`.
    pub fn show(&self, contact_id: ContactId) -> ServiceResult<Outcome> {
        let contact = self.contacts.find_contact(contact_id)?;
        Ok(Outcome::Render(Page::ContactDetail {
            contact_id,
            contact,
        }))
    }

    /// `GET /home/{id}/edit`.
    pub fn edit_form(&self, contact_id: ContactId) -> ServiceResult<Outcome> {
        let contact = self.contacts.find_contact(contact_id)?;
        Ok(Outcome::Render(Page::EditContact {
            contact_id,
            contact,
        }))
    }

    /// `POST /home/{id}`: overwrites all fields without re-validating.
    pub fn update(
        &self,
        ctx: &mut RequestContext,
        contact_id: ContactId,
        fields: NewContact,
    ) -> ServiceResult<Outcome> {
        self.contacts
            .update_contact(&fields.name, &fields.phone, &fields.email, contact_id)?;
        info!("event=contact_update module=service status=ok contact_id={contact_id}");
        ctx.set_success(CONTACT_UPDATED);
        Ok(Outcome::redirect(format!("/home/{contact_id}")))
    }

    /// `POST /home/{id}/delete`.
    pub fn delete(&self, ctx: &mut RequestContext, contact_id: ContactId) -> ServiceResult<Outcome> {
        self.contacts.delete_contact(contact_id)?;
        info!("event=contact_delete module=service status=ok contact_id={contact_id}");
        ctx.set_success(CONTACT_DELETED);
        Ok(Outcome::redirect("/home"))
    }
}
