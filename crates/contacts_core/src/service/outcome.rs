//! Handler outcomes and per-request flash context.
//!
//! # Responsibility
//! - Describe what the rendering layer should do after a handler runs.
//! - Carry one-shot success/error feedback for the current request.
//!
//! # Invariants
//! - A flash is consumed at most once: `take_flash` leaves the context empty.

use crate::model::contact::{Contact, ContactId};
use crate::model::group::{Group, GroupId};
use serde::Serialize;

/// One-shot feedback shown on the next rendered page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
}

impl Flash {
    /// Returns whether neither message is set.
    pub fn is_empty(&self) -> bool {
        self.success.is_none() && self.error.is_none()
    }
}

/// Explicit per-request context populated by handlers.
#[derive(Debug, Default)]
pub struct RequestContext {
    flash: Flash,
}

impl RequestContext {
    /// Starts a request with a flash carried over from the previous redirect.
    pub fn with_flash(flash: Flash) -> Self {
        Self { flash }
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.flash.success = Some(message.into());
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.flash.error = Some(message.into());
    }

    /// Read-only view of the pending flash.
    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    /// Consumes the pending flash, leaving the context empty.
    pub fn take_flash(&mut self) -> Flash {
        std::mem::take(&mut self.flash)
    }
}

/// Group row annotated with whether anyone belongs to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    #[serde(flatten)]
    pub group: Group,
    pub is_empty: bool,
}

/// Page view models handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    Home {
        groups: Vec<GroupSummary>,
        contacts: Vec<Contact>,
    },
    Search {
        query: Option<String>,
        results: Vec<Contact>,
    },
    NewContact,
    ContactDetail {
        contact_id: ContactId,
        contact: Option<Contact>,
    },
    EditContact {
        contact_id: ContactId,
        contact: Option<Contact>,
    },
    AddToGroup {
        contact_id: ContactId,
        contact: Option<Contact>,
        groups: Vec<Group>,
    },
    GroupDetail {
        group_id: GroupId,
        group: Option<Group>,
        members: Vec<Contact>,
        contacts: Vec<Contact>,
    },
}

/// Result of one handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Render(Page),
    Redirect(String),
}

impl Outcome {
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect(location.into())
    }
}
