//! Workflow repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `workflows` table.
//!
//! # Invariants
//! - Write paths validate drafts before SQL mutations.
//! - Deleting a workflow cascades through protocols, steps and parameters
//!   at the storage layer.

use crate::model::entity::{EntityId, Workflow, WorkflowFields};
use crate::repo::{ensure_row_changed, EntityKind, RepoResult};
use rusqlite::{params, Connection, Row};

const WORKFLOW_SELECT_SQL: &str = "SELECT id, name FROM workflows";

/// Repository interface for workflow CRUD operations.
pub trait WorkflowRepository {
    /// Inserts one workflow and returns its store-assigned id.
    fn create_workflow(&self, fields: &WorkflowFields) -> RepoResult<EntityId>;
    /// Loads one workflow by id.
    fn get_workflow(&self, id: EntityId) -> RepoResult<Option<Workflow>>;
    /// Lists every workflow in insertion order.
    fn list_workflows(&self) -> RepoResult<Vec<Workflow>>;
    /// Overwrites every mutable column of one workflow.
    fn update_workflow(&self, id: EntityId, fields: &WorkflowFields) -> RepoResult<()>;
    /// Deletes one workflow and everything cascading from it.
    fn delete_workflow(&self, id: EntityId) -> RepoResult<()>;
    /// Deletes every workflow, cascading through all dependent kinds.
    fn delete_all_workflows(&self) -> RepoResult<()>;
}

/// SQLite-backed workflow repository.
pub struct SqliteWorkflowRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkflowRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl WorkflowRepository for SqliteWorkflowRepository<'_> {
    fn create_workflow(&self, fields: &WorkflowFields) -> RepoResult<EntityId> {
        fields.validate()?;

        self.conn.execute(
            "INSERT INTO workflows (name) VALUES (?1);",
            params![fields.name.as_str()],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_workflow(&self, id: EntityId) -> RepoResult<Option<Workflow>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WORKFLOW_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_workflow_row(row)?));
        }

        Ok(None)
    }

    fn list_workflows(&self) -> RepoResult<Vec<Workflow>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WORKFLOW_SELECT_SQL} ORDER BY id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut workflows = Vec::new();
        while let Some(row) = rows.next()? {
            workflows.push(parse_workflow_row(row)?);
        }

        Ok(workflows)
    }

    fn update_workflow(&self, id: EntityId, fields: &WorkflowFields) -> RepoResult<()> {
        fields.validate()?;

        let changed = self.conn.execute(
            "UPDATE workflows SET name = ?1 WHERE id = ?2;",
            params![fields.name.as_str(), id],
        )?;

        ensure_row_changed(changed, EntityKind::Workflow, id)
    }

    fn delete_workflow(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM workflows WHERE id = ?1;", params![id])?;

        ensure_row_changed(changed, EntityKind::Workflow, id)
    }

    fn delete_all_workflows(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM workflows;", [])?;
        Ok(())
    }
}

fn parse_workflow_row(row: &Row<'_>) -> RepoResult<Workflow> {
    Ok(Workflow {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
