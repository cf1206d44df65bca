//! Registry use-case services.
//!
//! # Responsibility
//! - Aggregate repository calls behind one facade for boundary callers.
//! - Keep transport layers decoupled from storage details.

pub mod registry_service;
