//! Parameter repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `parameters` table.
//!
//! # Invariants
//! - `value_type` is persisted as its tag string; rows carrying an
//!   unrecognized tag are reported as corrupt instead of masked.
//! - `value` is stored as text regardless of kind.

use crate::model::entity::{EntityId, Parameter, ParameterFields, ValueKind};
use crate::repo::{ensure_row_changed, EntityKind, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const PARAMETER_SELECT_SQL: &str =
    "SELECT id, step_id, name, value_type, value FROM parameters";

/// Repository interface for parameter CRUD operations.
pub trait ParameterRepository {
    /// Inserts one parameter and returns its store-assigned id.
    fn create_parameter(&self, fields: &ParameterFields) -> RepoResult<EntityId>;
    /// Loads one parameter by id.
    fn get_parameter(&self, id: EntityId) -> RepoResult<Option<Parameter>>;
    /// Lists every parameter in insertion order.
    fn list_parameters(&self) -> RepoResult<Vec<Parameter>>;
    /// Overwrites every mutable column of one parameter.
    fn update_parameter(&self, id: EntityId, fields: &ParameterFields) -> RepoResult<()>;
    /// Deletes one parameter.
    fn delete_parameter(&self, id: EntityId) -> RepoResult<()>;
    /// Deletes every parameter.
    fn delete_all_parameters(&self) -> RepoResult<()>;
}

/// SQLite-backed parameter repository.
pub struct SqliteParameterRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParameterRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ParameterRepository for SqliteParameterRepository<'_> {
    fn create_parameter(&self, fields: &ParameterFields) -> RepoResult<EntityId> {
        fields.validate()?;

        self.conn.execute(
            "INSERT INTO parameters (step_id, name, value_type, value)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                fields.step_id,
                fields.name.as_str(),
                fields.value_type.as_db_str(),
                fields.value.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_parameter(&self, id: EntityId) -> RepoResult<Option<Parameter>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PARAMETER_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_parameter_row(row)?));
        }

        Ok(None)
    }

    fn list_parameters(&self) -> RepoResult<Vec<Parameter>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PARAMETER_SELECT_SQL} ORDER BY id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut parameters = Vec::new();
        while let Some(row) = rows.next()? {
            parameters.push(parse_parameter_row(row)?);
        }

        Ok(parameters)
    }

    fn update_parameter(&self, id: EntityId, fields: &ParameterFields) -> RepoResult<()> {
        fields.validate()?;

        let changed = self.conn.execute(
            "UPDATE parameters
             SET step_id = ?1,
                 name = ?2,
                 value_type = ?3,
                 value = ?4
             WHERE id = ?5;",
            params![
                fields.step_id,
                fields.name.as_str(),
                fields.value_type.as_db_str(),
                fields.value.as_str(),
                id,
            ],
        )?;

        ensure_row_changed(changed, EntityKind::Parameter, id)
    }

    fn delete_parameter(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM parameters WHERE id = ?1;", params![id])?;

        ensure_row_changed(changed, EntityKind::Parameter, id)
    }

    fn delete_all_parameters(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM parameters;", [])?;
        Ok(())
    }
}

fn parse_parameter_row(row: &Row<'_>) -> RepoResult<Parameter> {
    let kind_text: String = row.get("value_type")?;
    let value_type = ValueKind::from_db_str(&kind_text).ok_or_else(|| {
        RepoError::CorruptRow(format!(
            "invalid value kind `{kind_text}` in parameters.value_type"
        ))
    })?;

    Ok(Parameter {
        id: row.get("id")?,
        step_id: row.get("step_id")?,
        name: row.get("name")?,
        value_type,
        value: row.get("value")?,
    })
}
