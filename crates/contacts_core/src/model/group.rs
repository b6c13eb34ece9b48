//! Group and membership domain model.
//!
//! Groups are seeded by the initial migration and never created at runtime.

use super::contact::ContactId;
use serde::{Deserialize, Serialize};

/// Database group identifier.
pub type GroupId = i64;

/// Named category contacts can be tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    /// Serialized as `type` to match the `groups.type` column.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Association of one contact with one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Membership {
    pub contact_id: ContactId,
    pub group_id: GroupId,
}
