//! Service error taxonomy.
//!
//! # Invariants
//! - `NotFound` and `NotAuthorized` are never conflated; where an operation
//!   must not reveal existence it reports `NotAuthorized` for both.
//! - Batch aborts keep the failing item's cause and the number of items
//!   already committed.

use crate::model::academic::EntityKind;
use crate::model::principal::Role;
use crate::model::validation::{DueDateError, TitleError};
use crate::repo::error::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Why a principal was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationFailure {
    /// The principal's role claim does not grant the operation.
    MissingRole { required: Role, actual: Role },
    /// The principal is not the instructor of the owning section.
    NotOwner { entity: EntityKind, id: i64 },
}

impl Display for AuthorizationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRole { required, actual } => {
                write!(f, "role {required} required, principal has {actual}")
            }
            Self::NotOwner { entity, id } => {
                write!(f, "principal does not own {entity} {id}")
            }
        }
    }
}

#[derive(Debug)]
pub enum ServiceError {
    /// Referenced entity does not exist.
    NotFound { entity: EntityKind, id: i64 },
    /// Principal may not read or mutate the target.
    NotAuthorized(AuthorizationFailure),
    InvalidTitle(TitleError),
    InvalidDueDate(DueDateError),
    /// Batch input rejected before any mutation; one message per offending item.
    ValidationFailed(Vec<String>),
    /// Batch stopped at `index`; the first `applied` items stay committed.
    BatchAborted {
        index: usize,
        applied: usize,
        source: Box<ServiceError>,
    },
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Innermost error, looking through `BatchAborted`.
    pub fn root(&self) -> &ServiceError {
        match self {
            Self::BatchAborted { source, .. } => source.root(),
            other => other,
        }
    }

    /// Stable machine-readable code for the failure kind.
    pub fn code(&self) -> &'static str {
        match self.root() {
            Self::NotFound { .. } => "not_found",
            Self::NotAuthorized(_) => "not_authorized",
            Self::InvalidTitle(_) | Self::InvalidDueDate(_) | Self::ValidationFailed(_) => {
                "validation_failed"
            }
            Self::InconsistentState(_) | Self::Repo(_) => "storage_error",
            // `root()` never yields a batch abort.
            Self::BatchAborted { .. } => "storage_error",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound { .. })
    }

    pub fn is_not_authorized(&self) -> bool {
        matches!(self.root(), Self::NotAuthorized(_))
    }

    pub fn is_validation(&self) -> bool {
        self.code() == "validation_failed"
    }

    pub(crate) fn not_found(entity: EntityKind, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub(crate) fn not_owner(entity: EntityKind, id: i64) -> Self {
        Self::NotAuthorized(AuthorizationFailure::NotOwner { entity, id })
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::NotAuthorized(reason) => write!(f, "not authorized: {reason}"),
            Self::InvalidTitle(err) => write!(f, "invalid title: {err}"),
            Self::InvalidDueDate(err) => write!(f, "invalid due date: {err}"),
            Self::ValidationFailed(messages) => {
                write!(f, "validation failed: {}", messages.join("; "))
            }
            Self::BatchAborted {
                index,
                applied,
                source,
            } => write!(
                f,
                "batch aborted at item {index} after {applied} committed update(s): {source}"
            ),
            Self::InconsistentState(details) => write!(f, "inconsistent gradebook state: {details}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTitle(err) => Some(err),
            Self::InvalidDueDate(err) => Some(err),
            Self::BatchAborted { source, .. } => Some(source.as_ref()),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Repo(other),
        }
    }
}

impl From<TitleError> for ServiceError {
    fn from(value: TitleError) -> Self {
        Self::InvalidTitle(value)
    }
}

impl From<DueDateError> for ServiceError {
    fn from(value: DueDateError) -> Self {
        Self::InvalidDueDate(value)
    }
}
