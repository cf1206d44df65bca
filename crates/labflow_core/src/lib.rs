//! Core domain logic for the laboratory protocol registry.
//! This crate is the single source of truth for storage and integrity
//! invariants; transport boundaries call into it and serialize its records.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entity::{
    EntityId, Parameter, ParameterFields, Protocol, ProtocolFields, Step, StepFields,
    ValidationError, ValueKind, Workflow, WorkflowFields,
};
pub use repo::parameter_repo::{ParameterRepository, SqliteParameterRepository};
pub use repo::protocol_repo::{ProtocolRepository, SqliteProtocolRepository};
pub use repo::step_repo::{SqliteStepRepository, StepRepository};
pub use repo::workflow_repo::{SqliteWorkflowRepository, WorkflowRepository};
pub use repo::{EntityKind, RepoError, RepoResult};
pub use service::registry_service::RegistryService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
