//! Schema versions for the contacts database.
//!
//! Version 1 is the whole schema: `contacts`, `groups` and the
//! `contact_groups` link table with its composite key and cascading foreign
//! keys. Later versions are appended to `MIGRATIONS` and applied in one
//! transaction, with the reached version stored in `PRAGMA user_version`.
//!
//! # Seeded groups
//! Groups are reference data. Version 1 inserts exactly [`SEEDED_GROUPS`]
//! with fixed ids, and no code path creates, renames or deletes a group, so
//! handlers may redirect to `/home/group/{id}` for these ids unconditionally.
//! A migration that changes this set must update [`SEEDED_GROUPS`] too.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// `(id, type)` of every group present after the latest migration.
pub const SEEDED_GROUPS: &[(i64, &str)] = &[(1, "family"), (2, "friends"), (3, "work")];

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "contacts_and_groups",
    sql: include_str!("0001_init.sql"),
}];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
