//! Neo4j connection management and transaction scoping.

use std::time::Duration;

use neo4rs::{query, ConfigBuilder, Graph, Query, Row, Txn};

use staffgraph_core::{Neo4jSettings, NodeId, ValidationError};

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("{label} not found with id {id}")]
    NotFound { label: &'static str, id: NodeId },

    #[error("Invalid input: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::from(&Neo4jSettings::default())
    }
}

impl From<&Neo4jSettings> for GraphConfig {
    fn from(settings: &Neo4jSettings) -> Self {
        Self {
            uri: settings.uri.clone(),
            user: settings.user.clone(),
            password: settings.password.clone(),
            database: settings.database.clone(),
            max_connections: settings.max_connections,
            fetch_size: settings.fetch_size,
        }
    }
}

/// Upper bound on the connectivity check done by [`GraphClient::connect`].
/// neo4rs retries refused connections with backoff for much longer.
const VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Whether a transaction may persist changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    /// Closed by rollback; never persists anything.
    Read,
    /// Committed on success, rolled back on error.
    Write,
}

/// Thread-safe Neo4j graph client with connection pooling.
///
/// Each operation borrows one pooled connection for the span of a single
/// transaction. Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    ///
    /// Building the pool opens no socket, so this also runs `RETURN 1` and
    /// fails with [`GraphError::Connection`] if the server does not answer.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let client = Self { graph };
        client.verify().await?;

        tracing::info!(uri = %config.uri, database = %config.database, "Connected to Neo4j");
        Ok(client)
    }

    /// Round-trip a trivial statement to prove the server is reachable.
    pub async fn verify(&self) -> Result<(), GraphError> {
        match tokio::time::timeout(VERIFY_TIMEOUT, self.graph.run(query("RETURN 1"))).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(GraphError::Connection(e.to_string())),
            Err(_) => Err(GraphError::Connection(format!(
                "no response within {}s",
                VERIFY_TIMEOUT.as_secs()
            ))),
        }
    }

    /// Get a reference to the underlying neo4rs Graph for direct operations.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }

    /// Execute a single auto-committed statement outside the query layer.
    pub async fn run(&self, query: Query) -> Result<(), GraphError> {
        self.graph.run(query).await?;
        Ok(())
    }

    /// Begin a transaction for one query-layer operation.
    pub(crate) async fn begin(&self, access: Access) -> Result<GraphTxn, GraphError> {
        let txn = self.graph.start_txn().await?;
        Ok(GraphTxn { txn, access })
    }
}

/// A transaction scoped to exactly one query-layer operation.
pub(crate) struct GraphTxn {
    txn: Txn,
    access: Access,
}

impl GraphTxn {
    /// Execute a statement whose result rows are not needed.
    pub(crate) async fn run(&mut self, query: Query) -> Result<(), GraphError> {
        self.txn.run(query).await?;
        Ok(())
    }

    /// Execute a statement and collect all rows.
    pub(crate) async fn rows(&mut self, query: Query) -> Result<Vec<Row>, GraphError> {
        let mut stream = self.txn.execute(query).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next(self.txn.handle()).await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Close the transaction according to its access mode and the outcome
    /// of the work done inside it.
    pub(crate) async fn finish<T>(
        self,
        outcome: Result<T, GraphError>,
    ) -> Result<T, GraphError> {
        let Self { txn, access } = self;
        let close = match (&outcome, access) {
            (Ok(_), Access::Write) => txn.commit().await,
            _ => txn.rollback().await,
        };
        settle(access, outcome, close)
    }
}

/// Combine an operation's outcome with the result of closing its transaction.
///
/// Only a failed commit changes the outcome. A failed rollback is logged and
/// the outcome stands.
fn settle<T>(
    access: Access,
    outcome: Result<T, GraphError>,
    close: Result<(), neo4rs::Error>,
) -> Result<T, GraphError> {
    match (outcome, access) {
        (Ok(value), Access::Write) => {
            close?;
            Ok(value)
        }
        (outcome, _) => {
            if let Err(rollback_err) = close {
                tracing::warn!(error = %rollback_err, "Rollback failed");
            }
            outcome
        }
    }
}

/// Read an optional string property off a node.
pub(crate) fn string_prop(node: &neo4rs::Node, key: &str) -> Option<String> {
    node.get::<String>(key).ok()
}

/// Extract a node column from a row.
pub(crate) fn node_column(row: &Row, column: &str) -> Result<neo4rs::Node, GraphError> {
    row.get::<neo4rs::Node>(column)
        .map_err(|e| GraphError::Serialization(format!("Failed to deserialize node: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broken_pipe() -> neo4rs::Error {
        neo4rs::Error::from(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
    }

    #[test]
    fn read_keeps_rows_when_rollback_fails() {
        let settled = settle(Access::Read, Ok(vec![1, 2]), Err(broken_pipe()));
        assert_eq!(settled.unwrap(), vec![1, 2]);
    }

    #[test]
    fn write_fails_when_commit_fails() {
        let settled = settle(Access::Write, Ok(()), Err(broken_pipe()));
        assert!(matches!(settled, Err(GraphError::Query(_))));
    }

    #[test]
    fn failed_operation_keeps_its_own_error() {
        let id = NodeId::from_raw(3);
        let settled: Result<(), _> = settle(
            Access::Write,
            Err(GraphError::NotFound { label: "Employee", id }),
            Err(broken_pipe()),
        );
        assert!(matches!(settled, Err(GraphError::NotFound { label: "Employee", .. })));
    }

    #[test]
    fn clean_close_passes_outcome_through() {
        assert_eq!(settle(Access::Read, Ok(5), Ok(())).unwrap(), 5);
        assert_eq!(settle(Access::Write, Ok(5), Ok(())).unwrap(), 5);
    }

    #[tokio::test]
    async fn connect_fails_fast_when_server_unreachable() {
        let config = GraphConfig {
            uri: "bolt://127.0.0.1:1".to_string(),
            ..GraphConfig::default()
        };
        let started = std::time::Instant::now();
        let err = GraphClient::connect(&config).await.err();
        assert!(matches!(err, Some(GraphError::Connection(_))));
        assert!(started.elapsed() < VERIFY_TIMEOUT + Duration::from_secs(5));
    }
}
