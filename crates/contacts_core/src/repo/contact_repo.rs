//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/find/search/create/update/delete over `contacts`.
//! - Remove a contact's memberships together with the contact row.
//!
//! # Invariants
//! - `list_contacts` is ordered by `name ASC, id ASC`.
//! - `search_contacts` never matches on an absent or empty query and folds
//!   case with Unicode rules, not SQLite's ASCII-only `LIKE`.
//! - `create_contact` does not check name uniqueness; callers own that rule.
//! - `update_contact` and `delete_contact` are no-ops for unknown ids.

use super::{ensure_connection_ready, log_query, RepoResult};
use crate::model::contact::{Contact, ContactId, NewContact};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const CONTACT_SELECT_SQL: &str = "SELECT id, name, phone, email FROM contacts";

/// Repository interface for contact rows.
pub trait ContactRepository {
    /// Lists every contact ordered by name.
    fn list_contacts(&self) -> RepoResult<Vec<Contact>>;
    /// Inserts one contact and returns its generated id.
    fn create_contact(&self, name: &str, phone: &str, email: &str) -> RepoResult<ContactId>;
    /// Loads one contact by id.
    fn find_contact(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    /// Case-insensitive substring match on contact name.
    fn search_contacts(&self, query: Option<&str>) -> RepoResult<Vec<Contact>> {
        let Some(query) = query.filter(|value| !value.is_empty()) else {
            return Ok(Vec::new());
        };

        // SQLite LIKE folds ASCII only, so matching runs on Unicode-lowered
        // names here; the query is never interpreted as a pattern.
        let needle = query.to_lowercase();
        let contacts = self
            .list_contacts()?
            .into_iter()
            .filter(|contact| contact.name.to_lowercase().contains(&needle))
            .collect();
        Ok(contacts)
    }

    fn update_contact(
        &self,
        name: &str,
        phone: &str,
        email: &str,
        id: ContactId,
    ) -> RepoResult<()> {
        let sql = "UPDATE contacts SET name = ?1, phone = ?2, email = ?3 WHERE id = ?4;";
        log_query(sql, &[&name, &phone, &email, &id]);

        self.conn.execute(sql, params![name, phone, email, id])?;
        Ok(())
    }

    fn delete_contact(&self, id: ContactId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        // Explicit cleanup keeps memberships consistent even on connections
        // opened without `foreign_keys=ON`.
        let memberships_sql = "DELETE FROM contact_groups WHERE contact_id = ?1;";
        log_query(memberships_sql, &[&id]);
        tx.execute(memberships_sql, [id])?;

        let contact_sql = "DELETE FROM contacts WHERE id = ?1;";
        log_query(contact_sql, &[&id]);
        tx.execute(contact_sql, [id])?;

        tx.commit()?;
        Ok(())
    }
}

pub(crate) fn parse_contact_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get("id")?,
        name: row.get("name")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
    })
}
