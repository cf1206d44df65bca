//! Registry entity records and their draft shapes.
//!
//! # Responsibility
//! - Define one record type per stored entity kind, mirroring table column
//!   order.
//! - Define `*Fields` drafts carrying the full mutable attribute set.
//!
//! # Invariants
//! - `id` is assigned by the store and never supplied by callers.
//! - A draft is valid for create and for full-replace update alike; updates
//!   overwrite every mutable column, never a partial patch.
//! - `Parameter::value` stays text regardless of `ValueKind`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier (SQLite rowid).
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntityId = i64;

/// Classification tag for a parameter value.
///
/// The value itself is always stored as text; the kind only declares how a
/// consumer should interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Value text encodes a number (quantity, temperature, duration...).
    Numeric,
    /// Value text names one option out of a discrete set.
    Categorical,
}

impl ValueKind {
    /// Returns the tag persisted in `parameters.value_type`.
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
        }
    }

    /// Parses a persisted `parameters.value_type` tag.
    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "numeric" => Some(Self::Numeric),
            "categorical" => Some(Self::Categorical),
            _ => None,
        }
    }
}

/// Top-level named grouping of protocols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: EntityId,
    pub name: String,
}

/// Mutable attribute set for a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowFields {
    pub name: String,
}

/// A named procedure, optionally owned by a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protocol {
    pub id: EntityId,
    /// Owning workflow. `None` means a free-standing protocol.
    pub workflow_id: Option<EntityId>,
    pub name: String,
    pub description: Option<String>,
}

/// Mutable attribute set for a protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolFields {
    pub workflow_id: Option<EntityId>,
    pub name: String,
    pub description: Option<String>,
}

/// One instruction within a protocol.
///
/// Steps form a parent-pointer tree inside their protocol; `step_order`
/// establishes sibling sequence but is not unique within a protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: EntityId,
    pub protocol_id: EntityId,
    /// Parent step. `None` means a root-level step of the protocol.
    pub parent_step_id: Option<EntityId>,
    pub description: String,
    /// Sibling ordering key assigned by the caller.
    pub step_order: i64,
}

/// Mutable attribute set for a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFields {
    pub protocol_id: EntityId,
    pub parent_step_id: Option<EntityId>,
    pub description: String,
    pub step_order: i64,
}

/// A named, typed value attached to a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: EntityId,
    pub step_id: EntityId,
    pub name: String,
    pub value_type: ValueKind,
    pub value: String,
}

/// Mutable attribute set for a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterFields {
    pub step_id: EntityId,
    pub name: String,
    pub value_type: ValueKind,
    pub value: String,
}

/// Draft-level validation failure, raised before any SQL runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyWorkflowName,
    EmptyProtocolName,
    EmptyStepDescription,
    EmptyParameterName,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyWorkflowName => write!(f, "workflow name must not be empty"),
            Self::EmptyProtocolName => write!(f, "protocol name must not be empty"),
            Self::EmptyStepDescription => write!(f, "step description must not be empty"),
            Self::EmptyParameterName => write!(f, "parameter name must not be empty"),
        }
    }
}

impl Error for ValidationError {}

impl WorkflowFields {
    /// Checks draft invariants prior to persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyWorkflowName);
        }
        Ok(())
    }
}

impl ProtocolFields {
    /// Checks draft invariants prior to persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyProtocolName);
        }
        Ok(())
    }
}

impl StepFields {
    /// Checks draft invariants prior to persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyStepDescription);
        }
        Ok(())
    }
}

impl ParameterFields {
    /// Checks draft invariants prior to persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyParameterName);
        }
        Ok(())
    }
}
