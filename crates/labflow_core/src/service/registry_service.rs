//! Registry facade over the four entity repositories.
//!
//! # Responsibility
//! - Provide one object a transport boundary can hold to reach every
//!   repository operation.
//! - Delegate without adding semantics; status mapping (404 on absent or
//!   empty results) stays with the boundary.
//!
//! # Invariants
//! - The facade never bypasses repository validation or the parent-cycle
//!   guard.

use crate::model::entity::{
    EntityId, Parameter, ParameterFields, Protocol, ProtocolFields, Step, StepFields, Workflow,
    WorkflowFields,
};
use crate::repo::parameter_repo::{ParameterRepository, SqliteParameterRepository};
use crate::repo::protocol_repo::{ProtocolRepository, SqliteProtocolRepository};
use crate::repo::step_repo::{SqliteStepRepository, StepRepository};
use crate::repo::workflow_repo::{SqliteWorkflowRepository, WorkflowRepository};
use crate::repo::RepoResult;
use rusqlite::Connection;

/// Use-case facade over one migrated registry connection.
pub struct RegistryService<'conn> {
    workflows: SqliteWorkflowRepository<'conn>,
    protocols: SqliteProtocolRepository<'conn>,
    steps: SqliteStepRepository<'conn>,
    parameters: SqliteParameterRepository<'conn>,
}

impl<'conn> RegistryService<'conn> {
    /// Creates a service over a connection produced by `db::open_db` or
    /// `db::open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            workflows: SqliteWorkflowRepository::new(conn),
            protocols: SqliteProtocolRepository::new(conn),
            steps: SqliteStepRepository::new(conn),
            parameters: SqliteParameterRepository::new(conn),
        }
    }

    pub fn create_workflow(&self, fields: &WorkflowFields) -> RepoResult<EntityId> {
        self.workflows.create_workflow(fields)
    }

    pub fn get_workflow(&self, id: EntityId) -> RepoResult<Option<Workflow>> {
        self.workflows.get_workflow(id)
    }

    pub fn list_workflows(&self) -> RepoResult<Vec<Workflow>> {
        self.workflows.list_workflows()
    }

    pub fn update_workflow(&self, id: EntityId, fields: &WorkflowFields) -> RepoResult<()> {
        self.workflows.update_workflow(id, fields)
    }

    pub fn delete_workflow(&self, id: EntityId) -> RepoResult<()> {
        self.workflows.delete_workflow(id)
    }

    pub fn delete_all_workflows(&self) -> RepoResult<()> {
        self.workflows.delete_all_workflows()
    }

    pub fn create_protocol(&self, fields: &ProtocolFields) -> RepoResult<EntityId> {
        self.protocols.create_protocol(fields)
    }

    pub fn get_protocol(&self, id: EntityId) -> RepoResult<Option<Protocol>> {
        self.protocols.get_protocol(id)
    }

    pub fn list_protocols(&self) -> RepoResult<Vec<Protocol>> {
        self.protocols.list_protocols()
    }

    pub fn update_protocol(&self, id: EntityId, fields: &ProtocolFields) -> RepoResult<()> {
        self.protocols.update_protocol(id, fields)
    }

    pub fn delete_protocol(&self, id: EntityId) -> RepoResult<()> {
        self.protocols.delete_protocol(id)
    }

    pub fn delete_all_protocols(&self) -> RepoResult<()> {
        self.protocols.delete_all_protocols()
    }

    pub fn create_step(&self, fields: &StepFields) -> RepoResult<EntityId> {
        self.steps.create_step(fields)
    }

    pub fn get_step(&self, id: EntityId) -> RepoResult<Option<Step>> {
        self.steps.get_step(id)
    }

    pub fn list_steps(&self) -> RepoResult<Vec<Step>> {
        self.steps.list_steps()
    }

    pub fn list_steps_by_protocol(&self, protocol_id: EntityId) -> RepoResult<Vec<Step>> {
        self.steps.list_steps_by_protocol(protocol_id)
    }

    pub fn update_step(&self, id: EntityId, fields: &StepFields) -> RepoResult<()> {
        self.steps.update_step(id, fields)
    }

    pub fn delete_step(&self, id: EntityId) -> RepoResult<()> {
        self.steps.delete_step(id)
    }

    pub fn delete_all_steps(&self) -> RepoResult<()> {
        self.steps.delete_all_steps()
    }

    pub fn create_parameter(&self, fields: &ParameterFields) -> RepoResult<EntityId> {
        self.parameters.create_parameter(fields)
    }

    pub fn get_parameter(&self, id: EntityId) -> RepoResult<Option<Parameter>> {
        self.parameters.get_parameter(id)
    }

    pub fn list_parameters(&self) -> RepoResult<Vec<Parameter>> {
        self.parameters.list_parameters()
    }

    pub fn update_parameter(&self, id: EntityId, fields: &ParameterFields) -> RepoResult<()> {
        self.parameters.update_parameter(id, fields)
    }

    pub fn delete_parameter(&self, id: EntityId) -> RepoResult<()> {
        self.parameters.delete_parameter(id)
    }

    pub fn delete_all_parameters(&self) -> RepoResult<()> {
        self.parameters.delete_all_parameters()
    }
}
