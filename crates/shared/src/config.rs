//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Book-level accounting configuration.
    pub books: BooksConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Book-level accounting configuration.
///
/// The base currency is the book's reporting currency: every entry is
/// normalized into it for balancing and aggregation. Exchange rates are
/// quoted per 100 units of the fixed reference currency regardless of
/// the base currency choice.
#[derive(Debug, Clone, Deserialize)]
pub struct BooksConfig {
    /// ISO 4217 code of the book's base (reporting) currency.
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    /// Base URL of the external FX rate source.
    #[serde(default = "default_fx_source_url")]
    pub fx_source_url: String,
    /// Timeout in seconds for FX source requests.
    #[serde(default = "default_fx_timeout_secs")]
    pub fx_timeout_secs: u64,
}

fn default_base_currency() -> String {
    "CNY".to_string()
}

fn default_fx_source_url() -> String {
    "https://api.frankfurter.dev/v1".to_string()
}

fn default_fx_timeout_secs() -> u64 {
    10
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEDGERBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
