//! staffgraph-graph — the query layer over Neo4j.
//!
//! Every employee and department operation maps to parameterized Cypher run
//! inside one transaction. The transport layer consumes it through the
//! [`StaffStore`] trait so the store can be swapped for [`MemoryStore`].

pub mod client;
pub mod memory;
pub mod mutations;
pub mod queries;
pub mod store;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use memory::MemoryStore;
pub use store::StaffStore;
