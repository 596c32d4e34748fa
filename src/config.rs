//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use crate::state::ProductStore;
use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Persistence configuration
    pub persistence: PersistenceConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Persistence configuration
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Path of the product document
    pub products_file: PathBuf,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            persistence: PersistenceConfig {
                products_file: env::var_os("PRODUCTS_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(ProductStore::default_path),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var("PORT");
        env::remove_var("HOST");
        env::remove_var("PRODUCTS_FILE");
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env();
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert_eq!(config.persistence.products_file, ProductStore::default_path());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("PORT", "8081");
        env::set_var("HOST", "127.0.0.1");
        env::set_var("PRODUCTS_FILE", "/tmp/catalogue.json");

        let config = Config::from_env();
        assert_eq!(config.server_addr(), "127.0.0.1:8081");
        assert_eq!(
            config.persistence.products_file,
            PathBuf::from("/tmp/catalogue.json")
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_falls_back() {
        clear_env();
        env::set_var("PORT", "not-a-port");
        assert_eq!(Config::from_env().server.port, 3000);
        clear_env();
    }
}
