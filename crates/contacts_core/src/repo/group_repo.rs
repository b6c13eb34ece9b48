//! Group and membership repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Resolve the fixed groups by id or by type.
//! - Add, remove and query `(contact_id, group_id)` memberships.
//!
//! # Invariants
//! - A membership pair exists at most once (composite primary key).
//! - `add_membership` resolves the group and inserts in one transaction.
//! - `remove_membership` is a no-op when the pair is absent.

use super::contact_repo::parse_contact_row;
use super::{ensure_connection_ready, log_query, RepoError, RepoResult};
use crate::model::contact::{Contact, ContactId};
use crate::model::group::{Group, GroupId, Membership};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const GROUP_SELECT_SQL: &str = "SELECT id, type FROM groups";

/// Repository interface for groups and memberships.
pub trait GroupRepository {
    /// Lists every group ordered by id.
    fn list_groups(&self) -> RepoResult<Vec<Group>>;
    /// Loads one group by its type label.
    fn group_by_type(&self, kind: &str) -> RepoResult<Option<Group>>;
    /// Loads one group by id.
    fn group_by_id(&self, id: GroupId) -> RepoResult<Option<Group>>;
    /// Adds a contact to the group labelled `group_type`.
    fn add_membership(&self, contact_id: ContactId, group_type: &str) -> RepoResult<Membership>;
    /// Removes one membership pair.
    fn remove_membership(&self, contact_id: ContactId, group_id: GroupId) -> RepoResult<()>;
    /// Returns whether the membership pair exists.
    fn is_member(&self, contact_id: ContactId, group_id: GroupId) -> RepoResult<bool>;
    /// Lists the contacts belonging to one group, ordered by name.
    fn group_members(&self, group_id: GroupId) -> RepoResult<Vec<Contact>>;
    /// Returns whether no membership references the group.
    fn is_group_empty(&self, group_id: GroupId) -> RepoResult<bool>;
}

/// SQLite-backed group repository.
pub struct SqliteGroupRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGroupRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["groups", "contact_groups", "contacts"])?;
        Ok(Self { conn })
    }
}

impl GroupRepository for SqliteGroupRepository<'_> {
    fn list_groups(&self) -> RepoResult<Vec<Group>> {
        let sql = format!("{GROUP_SELECT_SQL} ORDER BY id ASC;");
        log_query(&sql, &[]);

        let mut stmt = self.conn.prepare(&sql)?;
        let groups = stmt
            .query_map([], parse_group_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(groups)
    }

    fn group_by_type(&self, kind: &str) -> RepoResult<Option<Group>> {
        find_group_by_type(self.conn, kind)
    }

    fn group_by_id(&self, id: GroupId) -> RepoResult<Option<Group>> {
        let sql = format!("{GROUP_SELECT_SQL} WHERE id = ?1;");
        log_query(&sql, &[&id]);

        let group = self
            .conn
            .query_row(&sql, [id], parse_group_row)
            .optional()?;
        Ok(group)
    }

    fn add_membership(&self, contact_id: ContactId, group_type: &str) -> RepoResult<Membership> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let group = find_group_by_type(&tx, group_type)?
            .ok_or_else(|| RepoError::GroupNotFound(group_type.to_string()))?;

        let sql = "INSERT INTO contact_groups (contact_id, group_id) VALUES (?1, ?2);";
        log_query(sql, &[&contact_id, &group.id]);
        tx.execute(sql, params![contact_id, group.id])?;

        tx.commit()?;
        Ok(Membership {
            contact_id,
            group_id: group.id,
        })
    }

    fn remove_membership(&self, contact_id: ContactId, group_id: GroupId) -> RepoResult<()> {
        let sql = "DELETE FROM contact_groups WHERE contact_id = ?1 AND group_id = ?2;";
        log_query(sql, &[&contact_id, &group_id]);

        self.conn.execute(sql, params![contact_id, group_id])?;
        Ok(())
    }

    fn is_member(&self, contact_id: ContactId, group_id: GroupId) -> RepoResult<bool> {
        let sql = "SELECT EXISTS(
                SELECT 1
                FROM contact_groups
                WHERE contact_id = ?1 AND group_id = ?2
            );";
        log_query(sql, &[&contact_id, &group_id]);

        let exists: i64 = self
            .conn
            .query_row(sql, params![contact_id, group_id], |row| row.get(0))?;
        Ok(exists == 1)
    }

    fn group_members(&self, group_id: GroupId) -> RepoResult<Vec<Contact>> {
        let sql = "SELECT contacts.id, contacts.name, contacts.phone, contacts.email
             FROM contacts
             INNER JOIN contact_groups ON contact_groups.contact_id = contacts.id
             WHERE contact_groups.group_id = ?1
             ORDER BY contacts.name ASC, contacts.id ASC;";
        log_query(sql, &[&group_id]);

        let mut stmt = self.conn.prepare(sql)?;
        let members = stmt
            .query_map([group_id], parse_contact_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(members)
    }

    fn is_group_empty(&self, group_id: GroupId) -> RepoResult<bool> {
        let sql = "SELECT COUNT(*) FROM contact_groups WHERE group_id = ?1;";
        log_query(sql, &[&group_id]);

        let count: i64 = self.conn.query_row(sql, [group_id], |row| row.get(0))?;
        Ok(count == 0)
    }
}

fn find_group_by_type(conn: &Connection, kind: &str) -> RepoResult<Option<Group>> {
    let sql = format!("{GROUP_SELECT_SQL} WHERE type = ?1;");
    log_query(&sql, &[&kind]);

    let group = conn.query_row(&sql, [kind], parse_group_row).optional()?;
    Ok(group)
}

fn parse_group_row(row: &Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get("id")?,
        kind: row.get("type")?,
    })
}
