//! Domain records for the contacts book.
//!
//! # Responsibility
//! - Define the row shapes returned by the storage gateway.
//! - Own the contact-name length rule shared by create handlers.
//!
//! # Invariants
//! - Contacts and groups are identified by database-generated integer ids.
//! - Memberships have no identity beyond their `(contact_id, group_id)` pair.

pub mod contact;
pub mod group;
