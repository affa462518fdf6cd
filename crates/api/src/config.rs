use std::path::PathBuf;

/// Catalog refresh period when `CATALOG_TTL_SECS` is unset.
const DEFAULT_CATALOG_TTL_SECS: u64 = if cfg!(debug_assertions) { 5 } else { 60 };

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background jobs, in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JSON snapshot of the record store.
    pub snapshot_path: PathBuf,
    /// Seconds between catalog reloads.
    pub catalog_ttl_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                           |
    /// |------------------------|-----------------------------------|
    /// | `HOST`                 | `0.0.0.0`                         |
    /// | `PORT`                 | `3000`                            |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`           |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                              |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                              |
    /// | `SNAPSHOT_PATH`        | `data/snapshot.json`              |
    /// | `CATALOG_TTL_SECS`     | `60` (release) / `5` (debug)      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let snapshot_path = std::env::var("SNAPSHOT_PATH")
            .unwrap_or_else(|_| "data/snapshot.json".into())
            .into();

        let catalog_ttl_secs: u64 = std::env::var("CATALOG_TTL_SECS")
            .map(|v| v.parse().expect("CATALOG_TTL_SECS must be a valid u64"))
            .unwrap_or(DEFAULT_CATALOG_TTL_SECS);
        assert!(catalog_ttl_secs > 0, "CATALOG_TTL_SECS must be positive");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            snapshot_path,
            catalog_ttl_secs,
        }
    }
}
