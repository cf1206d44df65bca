//! Protocol repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `protocols` table.
//!
//! # Invariants
//! - Write paths validate drafts before SQL mutations.
//! - `workflow_id` is passed through as a raw identifier; a dangling
//!   reference is rejected by the foreign-key pragma, not pre-checked here.

use crate::model::entity::{EntityId, Protocol, ProtocolFields};
use crate::repo::{ensure_row_changed, EntityKind, RepoResult};
use rusqlite::{params, Connection, Row};

const PROTOCOL_SELECT_SQL: &str =
    "SELECT id, workflow_id, name, description FROM protocols";

/// Repository interface for protocol CRUD operations.
pub trait ProtocolRepository {
    /// Inserts one protocol and returns its store-assigned id.
    fn create_protocol(&self, fields: &ProtocolFields) -> RepoResult<EntityId>;
    /// Loads one protocol by id.
    fn get_protocol(&self, id: EntityId) -> RepoResult<Option<Protocol>>;
    /// Lists every protocol in insertion order.
    fn list_protocols(&self) -> RepoResult<Vec<Protocol>>;
    /// Overwrites every mutable column of one protocol.
    fn update_protocol(&self, id: EntityId, fields: &ProtocolFields) -> RepoResult<()>;
    /// Deletes one protocol and everything cascading from it.
    fn delete_protocol(&self, id: EntityId) -> RepoResult<()>;
    /// Deletes every protocol, cascading through steps and parameters.
    fn delete_all_protocols(&self) -> RepoResult<()>;
}

/// SQLite-backed protocol repository.
pub struct SqliteProtocolRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProtocolRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProtocolRepository for SqliteProtocolRepository<'_> {
    fn create_protocol(&self, fields: &ProtocolFields) -> RepoResult<EntityId> {
        fields.validate()?;

        self.conn.execute(
            "INSERT INTO protocols (workflow_id, name, description) VALUES (?1, ?2, ?3);",
            params![
                fields.workflow_id,
                fields.name.as_str(),
                fields.description.as_deref(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_protocol(&self, id: EntityId) -> RepoResult<Option<Protocol>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROTOCOL_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_protocol_row(row)?));
        }

        Ok(None)
    }

    fn list_protocols(&self) -> RepoResult<Vec<Protocol>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROTOCOL_SELECT_SQL} ORDER BY id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut protocols = Vec::new();
        while let Some(row) = rows.next()? {
            protocols.push(parse_protocol_row(row)?);
        }

        Ok(protocols)
    }

    fn update_protocol(&self, id: EntityId, fields: &ProtocolFields) -> RepoResult<()> {
        fields.validate()?;

        let changed = self.conn.execute(
            "UPDATE protocols
             SET workflow_id = ?1,
                 name = ?2,
                 description = ?3
             WHERE id = ?4;",
            params![
                fields.workflow_id,
                fields.name.as_str(),
                fields.description.as_deref(),
                id,
            ],
        )?;

        ensure_row_changed(changed, EntityKind::Protocol, id)
    }

    fn delete_protocol(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM protocols WHERE id = ?1;", params![id])?;

        ensure_row_changed(changed, EntityKind::Protocol, id)
    }

    fn delete_all_protocols(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM protocols;", [])?;
        Ok(())
    }
}

fn parse_protocol_row(row: &Row<'_>) -> RepoResult<Protocol> {
    Ok(Protocol {
        id: row.get("id")?,
        workflow_id: row.get("workflow_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
    })
}
