//! staffgraph-core: Shared types, configuration, and validation for the staffgraph service.
//!
//! This crate provides the foundational types used across all staffgraph components:
//! - Node records (Employee, Department) and the opaque `NodeId` handle
//! - Relationship types (WORKS_IN, MANAGES)
//! - Input validation for employee writes
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, Neo4jSettings, ServerSettings};
pub use error::ValidationError;
pub use types::{Department, Employee, EmployeeInput, EmployeeSummary, NodeId, RelType};
