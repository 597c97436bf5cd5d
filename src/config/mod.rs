//! Configuration management for CondoFlow Core

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Service name used in log output
    pub service_name: String,
    /// Log format: "json" or "compact"
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "condoflow-core".to_string(),
            log_format: "compact".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("CONDOFLOW_SERVICE_NAME")
                .unwrap_or_else(|_| "condoflow-core".to_string()),
            log_format: env::var("CONDOFLOW_LOG_FORMAT")
                .unwrap_or_else(|_| "compact".to_string()),
        }
    }
}
