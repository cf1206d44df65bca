//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define CRUD contracts per entity kind and keep SQL details inside the
//!   persistence boundary.
//! - Enforce draft validation and the step parent-cycle guard on write
//!   paths.
//!
//! # Invariants
//! - Each operation runs one statement on the caller-provided connection;
//!   there are no multi-statement transactions to coordinate.
//! - Update and delete of a missing id report `RepoError::NotFound` instead
//!   of the silent no-op of the original service (see DESIGN.md).

use crate::db::DbError;
use crate::model::entity::{EntityId, ValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod parameter_repo;
pub mod protocol_repo;
pub mod step_repo;
pub mod workflow_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity kinds stored by the registry, used to label semantic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Workflow,
    Protocol,
    Step,
    Parameter,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Workflow => "workflow",
            Self::Protocol => "protocol",
            Self::Step => "step",
            Self::Parameter => "parameter",
        };
        write!(f, "{label}")
    }
}

/// Generic repository error for registry persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Draft failed validation before any SQL ran.
    Validation(ValidationError),
    /// Underlying SQLite/bootstrap error, including foreign-key rejections.
    Db(DbError),
    /// Target row does not exist.
    NotFound { kind: EntityKind, id: EntityId },
    /// Persisted data cannot be converted to a valid read model.
    CorruptRow(String),
    /// Proposed parent assignment would make the step its own ancestor.
    ParentCycle {
        step_id: EntityId,
        parent_id: EntityId,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::CorruptRow(message) => write!(f, "invalid persisted registry data: {message}"),
            Self::ParentCycle { step_id, parent_id } => write!(
                f,
                "assigning parent {parent_id} to step {step_id} would create a cycle"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::CorruptRow(_) => None,
            Self::ParentCycle { .. } => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
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

/// Maps a zero-changed-rows write to the semantic not-found error.
pub(crate) fn ensure_row_changed(changed: usize, kind: EntityKind, id: EntityId) -> RepoResult<()> {
    if changed == 0 {
        return Err(RepoError::NotFound { kind, id });
    }
    Ok(())
}
