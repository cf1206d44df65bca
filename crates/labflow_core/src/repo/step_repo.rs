//! Step repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `steps` parent-pointer tree.
//! - Provide the protocol-scoped step listing used to render a procedure.
//!
//! # Invariants
//! - `list_steps_by_protocol` returns rows in insertion order (`id ASC`);
//!   callers wanting sibling order sort by `step_order` themselves.
//! - Update rejects a parent assignment whose ancestor chain reaches the
//!   updated step. Create performs no such check: a fresh row has no
//!   children, and self-referencing inserts are admitted (legacy fixtures
//!   contain them).

use crate::model::entity::{EntityId, Step, StepFields};
use crate::repo::{ensure_row_changed, EntityKind, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;

const STEP_SELECT_SQL: &str =
    "SELECT id, protocol_id, parent_step_id, description, step_order FROM steps";

/// Repository interface for step CRUD and tree operations.
pub trait StepRepository {
    /// Inserts one step and returns its store-assigned id.
    fn create_step(&self, fields: &StepFields) -> RepoResult<EntityId>;
    /// Loads one step by id.
    fn get_step(&self, id: EntityId) -> RepoResult<Option<Step>>;
    /// Lists every step in insertion order.
    fn list_steps(&self) -> RepoResult<Vec<Step>>;
    /// Lists the steps of one protocol in insertion order.
    fn list_steps_by_protocol(&self, protocol_id: EntityId) -> RepoResult<Vec<Step>>;
    /// Overwrites every mutable column of one step.
    fn update_step(&self, id: EntityId, fields: &StepFields) -> RepoResult<()>;
    /// Deletes one step, its subtree and their parameters.
    fn delete_step(&self, id: EntityId) -> RepoResult<()>;
    /// Deletes every step, cascading through parameters.
    fn delete_all_steps(&self) -> RepoResult<()>;
}

/// SQLite-backed step repository.
pub struct SqliteStepRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStepRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StepRepository for SqliteStepRepository<'_> {
    fn create_step(&self, fields: &StepFields) -> RepoResult<EntityId> {
        fields.validate()?;

        self.conn.execute(
            "INSERT INTO steps (protocol_id, parent_step_id, description, step_order)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                fields.protocol_id,
                fields.parent_step_id,
                fields.description.as_str(),
                fields.step_order,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_step(&self, id: EntityId) -> RepoResult<Option<Step>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STEP_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_step_row(row)?));
        }

        Ok(None)
    }

    fn list_steps(&self) -> RepoResult<Vec<Step>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STEP_SELECT_SQL} ORDER BY id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut steps = Vec::new();
        while let Some(row) = rows.next()? {
            steps.push(parse_step_row(row)?);
        }

        Ok(steps)
    }

    fn list_steps_by_protocol(&self, protocol_id: EntityId) -> RepoResult<Vec<Step>> {
        let mut stmt = self.conn.prepare(&format!(
            "{STEP_SELECT_SQL} WHERE protocol_id = ?1 ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query(params![protocol_id])?;
        let mut steps = Vec::new();
        while let Some(row) = rows.next()? {
            steps.push(parse_step_row(row)?);
        }

        Ok(steps)
    }

    fn update_step(&self, id: EntityId, fields: &StepFields) -> RepoResult<()> {
        fields.validate()?;

        if let Some(parent_id) = fields.parent_step_id {
            ensure_acyclic_parent(self.conn, id, parent_id)?;
        }

        let changed = self.conn.execute(
            "UPDATE steps
             SET protocol_id = ?1,
                 parent_step_id = ?2,
                 description = ?3,
                 step_order = ?4
             WHERE id = ?5;",
            params![
                fields.protocol_id,
                fields.parent_step_id,
                fields.description.as_str(),
                fields.step_order,
                id,
            ],
        )?;

        ensure_row_changed(changed, EntityKind::Step, id)
    }

    fn delete_step(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM steps WHERE id = ?1;", params![id])?;

        ensure_row_changed(changed, EntityKind::Step, id)
    }

    fn delete_all_steps(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM steps;", [])?;
        Ok(())
    }
}

/// Walks the proposed parent's ancestor chain before the update commits.
///
/// The chain terminates at a root step, at a dangling reference (the insert
/// will fail on its own), or when a previously visited step repeats — the
/// visited set keeps legacy self-referencing rows from hanging the walk.
fn ensure_acyclic_parent(
    conn: &Connection,
    step_id: EntityId,
    parent_id: EntityId,
) -> RepoResult<()> {
    let mut visited: HashSet<EntityId> = HashSet::new();
    let mut cursor = Some(parent_id);

    while let Some(current) = cursor {
        if current == step_id {
            return Err(RepoError::ParentCycle { step_id, parent_id });
        }
        if !visited.insert(current) {
            break;
        }

        cursor = conn
            .query_row(
                "SELECT parent_step_id FROM steps WHERE id = ?1;",
                params![current],
                |row| row.get::<_, Option<EntityId>>(0),
            )
            .optional()?
            .flatten();
    }

    Ok(())
}

fn parse_step_row(row: &Row<'_>) -> RepoResult<Step> {
    Ok(Step {
        id: row.get("id")?,
        protocol_id: row.get("protocol_id")?,
        parent_step_id: row.get("parent_step_id")?,
        description: row.get("description")?,
        step_order: row.get("step_order")?,
    })
}
