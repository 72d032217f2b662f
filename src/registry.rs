use std::collections::HashMap;
use std::sync::Arc;

use crate::client::SqlRsClient;
use crate::config::ConnectionConfig;
use crate::diagnostics::TracingSink;
use crate::drivers::{InMemoryTestDriver, SqliteDriver, TokioPostgresDriver};
use crate::error::{Result, SqlRsError};
use crate::traits::DatabaseDriver;

/// Builds a connected driver from a parsed configuration.
pub type DriverConstructor = fn(&ConnectionConfig) -> Result<Box<dyn DatabaseDriver>>;

/// Maps connection-URI schemes to driver constructors.
pub struct DriverRegistry {
    constructors: HashMap<String, DriverConstructor>,
}

impl DriverRegistry {
    /// A registry with no schemes.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register (or replace) the constructor for `scheme`.
    pub fn register(&mut self, scheme: &str, constructor: DriverConstructor) -> &mut Self {
        self.constructors
            .insert(scheme.to_ascii_lowercase(), constructor);
        self
    }

    pub fn schemes(&self) -> Vec<&str> {
        let mut schemes: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        schemes
    }

    /// Build a connected driver for the configuration's scheme.
    ///
    /// An unknown scheme fails `UnsupportedScheme` before anything is
    /// constructed. There is no fallback driver.
    pub fn driver(&self, config: &ConnectionConfig) -> Result<Box<dyn DatabaseDriver>> {
        let constructor = self
            .constructors
            .get(&config.scheme.to_ascii_lowercase())
            .ok_or_else(|| SqlRsError::UnsupportedScheme(config.scheme.clone()))?;
        constructor(config)
    }

    /// Parse `uri`, connect the matching driver and wrap it in a client.
    /// Diagnostics go to `tracing` when the configuration is verbose.
    pub fn open(&self, uri: &str) -> Result<SqlRsClient> {
        let config = ConnectionConfig::parse(uri)?;
        let driver = self.driver(&config)?;
        tracing::debug!(scheme = %config.scheme, adapter = driver.name(), "connected");

        let client = SqlRsClient::with_driver(driver);
        if config.verbose() {
            Ok(client.with_diagnostics(Arc::new(TracingSink)))
        } else {
            Ok(client)
        }
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register("pgsql", postgres_driver)
            .register("postgres", postgres_driver)
            .register("postgresql", postgres_driver)
            .register("sqlite", sqlite_driver)
            .register("mock", mock_driver);
        registry
    }
}

fn postgres_driver(config: &ConnectionConfig) -> Result<Box<dyn DatabaseDriver>> {
    Ok(Box::new(TokioPostgresDriver::connect(config)?))
}

fn sqlite_driver(config: &ConnectionConfig) -> Result<Box<dyn DatabaseDriver>> {
    Ok(Box::new(SqliteDriver::connect(config)?))
}

fn mock_driver(_config: &ConnectionConfig) -> Result<Box<dyn DatabaseDriver>> {
    Ok(Box::new(InMemoryTestDriver::new()))
}
