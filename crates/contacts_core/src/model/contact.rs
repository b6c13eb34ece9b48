//! Contact domain model.

use serde::{Deserialize, Serialize};

/// Database-generated contact identifier.
pub type ContactId = i64;

/// Inclusive lower bound for contact name length, counted in characters.
pub const NAME_MIN_CHARS: usize = 1;
/// Inclusive upper bound for contact name length, counted in characters.
pub const NAME_MAX_CHARS: usize = 100;

/// Persisted person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// Field set submitted by the create and edit forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl NewContact {
    /// Builds a field set with surrounding whitespace removed from every field.
    pub fn trimmed(name: &str, phone: &str, email: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            email: email.trim().to_string(),
        }
    }

    /// Returns whether `name` length lies within `[NAME_MIN_CHARS, NAME_MAX_CHARS]`.
    pub fn has_valid_name_length(&self) -> bool {
        (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&self.name.chars().count())
    }
}
