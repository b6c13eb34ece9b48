//! Core domain logic for the contacts manager.
//! This crate owns persistence and every business invariant; the web crate
//! only wires requests to the handlers exposed here.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget,
};
pub use model::contact::{Contact, ContactId, NewContact, NAME_MAX_CHARS, NAME_MIN_CHARS};
pub use model::group::{Group, GroupId, Membership};
pub use repo::contact_repo::{ContactRepository, SqliteContactRepository};
pub use repo::group_repo::{GroupRepository, SqliteGroupRepository};
pub use repo::{RepoError, RepoResult};
pub use service::contact_service::ContactService;
pub use service::group_service::GroupService;
pub use service::outcome::{Flash, GroupSummary, Outcome, Page, RequestContext};
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
