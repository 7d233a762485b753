//! Core domain types for the staffgraph graph.
//!
//! Employees and departments are nodes; WORKS_IN and MANAGES are the only
//! relationships between them, both directed employee → department.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ── Identity ──────────────────────────────────────────────────────

/// Store-assigned handle for a node.
///
/// Treat it as an opaque token: it round-trips through `Display`/`FromStr`
/// and serde, but carries no meaning beyond identifying one live node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(i64);

impl NodeId {
    /// Wrap a handle produced by the store.
    pub fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// The handle in the form the store binds as a query parameter.
    pub fn raw(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidId { raw: s.to_string() })
    }
}

// ── Relationships ─────────────────────────────────────────────────

/// Relationship types, both directed Employee → Department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelType {
    /// "is a member of"
    WorksIn,
    /// "is the manager of"
    Manages,
}

impl RelType {
    /// Cypher relationship type.
    pub fn as_cypher(self) -> &'static str {
        match self {
            Self::WorksIn => "WORKS_IN",
            Self::Manages => "MANAGES",
        }
    }
}

// ── Node Records ──────────────────────────────────────────────────

/// An Employee node as returned by the employee listing.
///
/// Attributes are optional because seeded placeholder nodes carry none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    pub id: NodeId,
    pub name: Option<String>,
    pub position: Option<String>,
}

/// `{name, position}` view of an employee, used by traversal results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmployeeSummary {
    pub name: Option<String>,
    pub position: Option<String>,
}

/// A Department node. Only the name is ever exposed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Department {
    pub name: Option<String>,
}

// ── Input ─────────────────────────────────────────────────────────

/// Body of employee create and update requests.
///
/// Missing fields deserialize as empty strings so that they fail
/// [`EmployeeInput::validate`] instead of the JSON extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmployeeInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: String,
}

impl EmployeeInput {
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
        }
    }

    /// Both fields must contain something other than whitespace.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "name" });
        }
        if self.position.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "position" });
        }
        Ok(())
    }
}
