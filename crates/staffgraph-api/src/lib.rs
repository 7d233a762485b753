//! staffgraph-api: HTTP transport for the employee graph.
//!
//! Each handler extracts its parameters, calls exactly one `StaffStore`
//! operation, and serializes the outcome as JSON.

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{router, AppState};
