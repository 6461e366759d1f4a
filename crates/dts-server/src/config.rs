//! Process configuration
//!
//! Settings come from a `.env` file when present, then the process
//! environment, then the defaults below. [`Config::load`] validates the
//! result before the server starts.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/dts";
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DATABASE_MIN_CONNECTIONS: u32 = 2;
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DATABASE_IDLE_TIMEOUT_SECS: u64 = 600;

pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Zero means one ingestion worker per core.
pub const DEFAULT_INGEST_WORKERS: usize = 0;
pub const DEFAULT_INGEST_SHUTDOWN_GRACE_SECS: u64 = 10;

/// The ingestion report lands under this directory.
pub const DEFAULT_REPORT_DIR: &str = ".";

/// Everything the server binary needs to start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub ingest: IngestConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
        }
    }
}

/// Connection pool settings for the postgres backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            min_connections: DEFAULT_DATABASE_MIN_CONNECTIONS,
            connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
            idle_timeout_secs: DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
        }
    }
}

/// An empty origin list opens the API to every origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
            allow_credentials: true,
        }
    }
}

/// Bulk ingestion tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Worker pool size; zero means one worker per core
    pub workers: usize,
    /// Grace period for draining file tasks at teardown
    pub shutdown_grace_secs: u64,
    /// Base directory the ingestion report is written under
    pub report_dir: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_INGEST_WORKERS,
            shutdown_grace_secs: DEFAULT_INGEST_SHUTDOWN_GRACE_SECS,
            report_dir: DEFAULT_REPORT_DIR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

/// Which [`Store`](crate::store::Store) implementation to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// PostgreSQL via the connection pool (production)
    #[default]
    Postgres,
    /// In-process hash maps (local development and tests)
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

impl Config {
    /// Read `.env`, overlay the process environment onto the defaults,
    /// and validate the result.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            server: ServerConfig {
                host: env_or_str("DTS_HOST", DEFAULT_SERVER_HOST),
                port: env_or("DTS_PORT", DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: env_or(
                    "DTS_SHUTDOWN_TIMEOUT",
                    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                ),
            },
            database: DatabaseConfig {
                url: env_or_str("DATABASE_URL", DEFAULT_DATABASE_URL),
                max_connections: env_or(
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_DATABASE_MAX_CONNECTIONS,
                ),
                min_connections: env_or(
                    "DATABASE_MIN_CONNECTIONS",
                    DEFAULT_DATABASE_MIN_CONNECTIONS,
                ),
                connect_timeout_secs: env_or(
                    "DATABASE_CONNECT_TIMEOUT",
                    DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                ),
                idle_timeout_secs: env_or(
                    "DATABASE_IDLE_TIMEOUT",
                    DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
                ),
            },
            cors: CorsConfig {
                allowed_origins: env_or_str("CORS_ALLOWED_ORIGINS", DEFAULT_CORS_ALLOWED_ORIGIN)
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect(),
                allow_credentials: env_or("CORS_ALLOW_CREDENTIALS", true),
            },
            ingest: IngestConfig {
                workers: env_or("INGEST_WORKERS", DEFAULT_INGEST_WORKERS),
                shutdown_grace_secs: env_or(
                    "INGEST_SHUTDOWN_GRACE_SECS",
                    DEFAULT_INGEST_SHUTDOWN_GRACE_SECS,
                ),
                report_dir: env_or_str("REPORT_DIR", DEFAULT_REPORT_DIR),
            },
            store: StoreConfig {
                backend: env_or("STORE_BACKEND", StoreBackend::Postgres),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.store.backend == StoreBackend::Postgres && self.database.url.is_empty() {
            anyhow::bail!("A database URL is required for the postgres backend");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("The database pool needs at least one connection");
        }

        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!(
                "Database pool bounds are inverted: min {} exceeds max {}",
                self.database.min_connections,
                self.database.max_connections
            );
        }

        if self.ingest.report_dir.is_empty() {
            anyhow::bail!("The ingestion report directory cannot be empty");
        }

        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("CORS origin list is empty, every origin will be accepted");
        }

        Ok(())
    }
}

/// Parsed environment variable, or `default` when unset or unparseable.
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

fn env_or_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
