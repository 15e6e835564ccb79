//! Configuration module for sitelens
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sitelens::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("API will listen on: {}", config.server.listen_addr);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ServerConfig, StoreConfig, WorkerConfig};

// Re-export parser functions
pub use parser::load_config;
