//! Storage gateway: repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Expose one method per business operation over contacts, groups and
//!   memberships.
//! - Keep SQL details inside the persistence boundary.
//! - Log every executed statement with its bound parameters.
//!
//! # Invariants
//! - All statements bind parameters; no user input is interpolated into SQL.
//! - Lookups by id or type return `Option`, never a not-found error.
//! - No caching: every read observes current database state.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use log::debug;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub mod contact_repo;
pub mod group_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage gateway failure.
#[derive(Debug)]
pub enum RepoError {
    /// Connection or statement execution failure, including constraint violations.
    Db(DbError),
    /// Membership insert referenced a group type that does not exist.
    GroupNotFound(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::GroupNotFound(kind) => write!(f, "group not found: `{kind}`"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "contacts repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "contacts repository requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::GroupNotFound(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Emits one `db_query` event for a statement about to run.
///
/// Whitespace is collapsed so multi-line SQL stays on one log line.
pub(crate) fn log_query(sql: &str, params: &[&dyn Debug]) {
    debug!(
        "event=db_query module=repo sql=\"{}\" params={:?}",
        sql.split_whitespace().collect::<Vec<_>>().join(" "),
        params
    );
}

pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    tables: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
