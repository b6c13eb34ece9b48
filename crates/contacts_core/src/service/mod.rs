//! Request handlers: validation and orchestration over the storage gateway.
//!
//! # Responsibility
//! - Apply business rules (name length, name uniqueness, membership dedup).
//! - Translate gateway results into `Outcome` values (render or redirect).
//! - Record one-shot feedback in the per-request `RequestContext`.
//!
//! # Invariants
//! - Handlers hold no state across requests.
//! - Validation failures are outcomes; only storage failures are errors.

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod contact_service;
pub mod group_service;
pub mod outcome;

/// Handler failure that cannot be recovered within the request.
#[derive(Debug)]
pub enum ServiceError {
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
