//! Configuration management for the Khata server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides shaped `KHATA__<SECTION>__<KEY>`,
//!    e.g. `KHATA__SERVER__PORT=8080` or `KHATA__DATABASE__URL=...`
//!
//! `KHATA_ENVIRONMENT` (single underscore) picks the config file and is read
//! before the layers are built.

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::ExpenseMonthRule;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Storage configuration
    pub database: DatabaseConfig,

    pub logging: LoggingConfig,

    pub reports: ReportsConfig,

    pub security: SecurityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Directory with a pre-built browser UI to serve at `/`
    #[serde(default)]
    pub static_dir: Option<String>,
}

/// Which storage implementation backs the API
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,

    /// PostgreSQL connection URL
    #[serde(default)]
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Apply embedded migrations on start
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReportsConfig {
    /// Count only this year's expenses in the dashboard's monthly figure
    pub monthly_expenses_match_year: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecurityConfig {
    /// bcrypt work factor for staff passwords
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl ReportsConfig {
    pub fn expense_month_rule(&self) -> ExpenseMonthRule {
        if self.monthly_expenses_match_year {
            ExpenseMonthRule::MonthAndYear
        } else {
            ExpenseMonthRule::MonthOnly
        }
    }
}

/// `KHATA__SERVER__PORT` overrides `server.port`
fn env_overrides() -> Environment {
    Environment::with_prefix("KHATA")
        .separator("__")
        .try_parsing(true)
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("KHATA_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.backend", "postgres")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.run_migrations", environment == "development")?
            .set_default("logging.json", false)?
            .set_default("reports.monthly_expenses_match_year", false)?
            .set_default("security.bcrypt_cost", i64::from(bcrypt::DEFAULT_COST))?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(env_overrides())
            .build()?;

        config.try_deserialize()
    }

    /// In-memory configuration for tests and quick local runs
    pub fn in_memory() -> Self {
        Self {
            environment: "test".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig {
                backend: StorageBackend::Memory,
                url: String::new(),
                max_connections: 1,
                min_connections: 0,
                run_migrations: false,
            },
            logging: LoggingConfig::default(),
            reports: ReportsConfig::default(),
            // Minimum cost keeps hashing fast in tests
            security: SecurityConfig { bcrypt_cost: 4 },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
            static_dir: None,
        }
    }
}
