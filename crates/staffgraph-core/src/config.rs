//! Configuration management for staffgraph.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`STAFFGRAPH__SECTION__KEY`)
//! 2. Config file (`staffgraph.toml`, or the given prefix)
//! 3. Defaults

use serde::Deserialize;

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub neo4j: Neo4jSettings,

    #[serde(default)]
    pub server: ServerSettings,
}

/// Connection settings for the graph store.
#[derive(Debug, Clone, Deserialize)]
pub struct Neo4jSettings {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_password")]
    pub password: String,

    /// Database name on the server.
    #[serde(default = "default_database")]
    pub database: String,

    /// Size of the Bolt connection pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Socket address to bind, e.g. "0.0.0.0:5000".
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl AppConfig {
    /// Load from `<file_prefix>.toml` (optional) overlaid with
    /// `STAFFGRAPH__` environment variables.
    pub fn load(file_prefix: &str) -> Result<Self, config::ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("STAFFGRAPH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app: AppConfig = cfg.try_deserialize()?;
        tracing::debug!(uri = %app.neo4j.uri, database = %app.neo4j.database, "Loaded configuration");
        Ok(app)
    }
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_password() -> String {
    "staffgraph-dev".to_string()
}

fn default_database() -> String {
    "neo4j".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: default_password(),
            database: default_database(),
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}
