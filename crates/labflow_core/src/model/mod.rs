//! Domain model for the protocol registry.
//!
//! # Responsibility
//! - Define the canonical records for workflows, protocols, steps and
//!   parameters.
//! - Define the draft shapes used by create and full-replace update calls.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `EntityId`.
//! - Deletion is permanent; there are no tombstones or versions.

pub mod entity;
