use crate::config::types::{Config, ServerConfig, StoreConfig, WorkerConfig};
use crate::ConfigError;
use std::net::SocketAddr;
use std::path::Path;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_store_config(&config.store)?;
    validate_worker_config(&config.worker)?;
    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.listen_addr.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!(
            "listen_addr must be a socket address like '127.0.0.1:8080', got '{}': {}",
            config.listen_addr, e
        ))
    })?;

    Ok(())
}

/// Validates store configuration
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    // A bare filename has an empty parent and resolves against the working
    // directory, which always exists.
    if let Some(parent) = Path::new(&config.database_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(ConfigError::Validation(format!(
                "database_path parent directory '{}' does not exist",
                parent.display()
            )));
        }
    }

    Ok(())
}

/// Validates worker configuration
fn validate_worker_config(config: &WorkerConfig) -> Result<(), ConfigError> {
    if config.retry_interval_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "retry_interval_ms must be >= 100ms, got {}ms",
            config.retry_interval_ms
        )));
    }

    Ok(())
}
