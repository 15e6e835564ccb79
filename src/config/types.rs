use serde::Deserialize;

/// Main configuration structure for sitelens
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub worker: WorkerConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the API listens on (e.g., "127.0.0.1:8080")
    #[serde(rename = "listen-addr")]
    pub listen_addr: String,
}

/// Job store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Worker behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    /// Upper bound on the wait between drain retries after a store error
    /// (milliseconds)
    #[serde(rename = "retry-interval-ms")]
    pub retry_interval_ms: u64,
}
