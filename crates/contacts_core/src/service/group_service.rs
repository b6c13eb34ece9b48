//! Group membership request handlers.
//!
//! # Responsibility
//! - Group page and add-to-group picker views.
//! - Add and remove memberships with fixed feedback messages.
//!
//! # Invariants
//! - Adding an existing member is rejected and leaves the table unchanged.
//! - Adding an unknown contact is rejected before any insert is attempted.
//! - Both membership writes redirect to the affected group page.

use super::outcome::{Outcome, Page, RequestContext};
use super::ServiceResult;
use crate::model::contact::ContactId;
use crate::model::group::GroupId;
use crate::repo::contact_repo::ContactRepository;
use crate::repo::group_repo::GroupRepository;
use log::{info, warn};

pub const ALREADY_MEMBER_ERROR: &str = "Contact already in this group.";
pub const GROUP_NOT_FOUND_ERROR: &str = "Group not found.";
pub const CONTACT_NOT_FOUND_ERROR: &str = "Contact not found.";
pub const MEMBER_ADDED: &str = "Added!";
pub const MEMBER_REMOVED: &str = "Removed!";

/// Group use-case handlers over gateway implementations.
pub struct GroupService<C: ContactRepository, G: GroupRepository> {
    contacts: C,
    groups: G,
}

impl<C: ContactRepository, G: GroupRepository> GroupService<C, G> {
    pub fn new(contacts: C, groups: G) -> Self {
        Self { contacts, groups }
    }

    /// `GET /home/group/{id}`: the group, its members, and every contact.
    pub fn group_page(&self, group_id: GroupId) -> ServiceResult<Outcome> {
        let group = self.groups.group_by_id(group_id)?;
        let members = self.groups.group_members(group_id)?;
        let contacts = self.contacts.list_contacts()?;

        Ok(Outcome::Render(Page::GroupDetail {
            group_id,
            group,
            members,
            contacts,
        }))
    }

    /// `GET /home/{id}/add_to_group`.
    pub fn add_form(&self, contact_id: ContactId) -> ServiceResult<Outcome> {
        let contact = self.contacts.find_contact(contact_id)?;
        let groups = self.groups.list_groups()?;

        Ok(Outcome::Render(Page::AddToGroup {
            contact_id,
            contact,
            groups,
        }))
    }

    /// `POST /home/groups/add/{id}`: adds the contact to the group named
    /// `group_type` unless it is already a member.
    pub fn add(
        &self,
        ctx: &mut RequestContext,
        contact_id: ContactId,
        group_type: &str,
    ) -> ServiceResult<Outcome> {
        if self.contacts.find_contact(contact_id)?.is_none() {
            warn!(
                "event=membership_add module=service status=rejected reason=contact_not_found contact_id={contact_id}"
            );
            ctx.set_error(CONTACT_NOT_FOUND_ERROR);
            return Ok(Outcome::redirect("/home"));
        }

        let Some(group) = self.groups.group_by_type(group_type)? else {
            warn!(
                "event=membership_add module=service status=rejected reason=group_not_found contact_id={contact_id}"
            );
            ctx.set_error(GROUP_NOT_FOUND_ERROR);
            return Ok(Outcome::redirect(format!("/home/{contact_id}/add_to_group")));
        };

        if self.groups.is_member(contact_id, group.id)? {
            info!(
                "event=membership_add module=service status=rejected reason=already_member contact_id={contact_id} group_id={}",
                group.id
            );
            ctx.set_error(ALREADY_MEMBER_ERROR);
        } else {
            let membership = self.groups.add_membership(contact_id, &group.kind)?;
            info!(
                "event=membership_add module=service status=ok contact_id={} group_id={}",
                membership.contact_id, membership.group_id
            );
            ctx.set_success(MEMBER_ADDED);
        }

        Ok(Outcome::redirect(format!("/home/group/{}", group.id)))
    }

    /// `POST /home/group/{group_id}/remove/{id}`.
    pub fn remove(
        &self,
        ctx: &mut RequestContext,
        contact_id: ContactId,
        group_id: GroupId,
    ) -> ServiceResult<Outcome> {
        self.groups.remove_membership(contact_id, group_id)?;
        info!(
            "event=membership_remove module=service status=ok contact_id={contact_id} group_id={group_id}"
        );
        ctx.set_success(MEMBER_REMOVED);
        Ok(Outcome::redirect(format!("/home/group/{group_id}")))
    }
}
