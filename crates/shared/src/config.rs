//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Identity of the company filing declarations.
    #[serde(default)]
    pub filer: FilerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
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

/// Filing entity written into the `Podmiot1` block of every declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilerConfig {
    /// Tax identification number of the filer.
    #[serde(default = "default_filer_nip")]
    pub nip: String,
    /// Registered company name.
    #[serde(default = "default_filer_name")]
    pub full_name: String,
    /// Contact e-mail.
    #[serde(default = "default_filer_email")]
    pub email: String,
    /// Contact phone.
    #[serde(default = "default_filer_phone")]
    pub phone: String,
    /// Code of the tax office the declaration is addressed to.
    #[serde(default = "default_tax_office_code")]
    pub tax_office_code: u16,
}

impl Default for FilerConfig {
    fn default() -> Self {
        Self {
            nip: default_filer_nip(),
            full_name: default_filer_name(),
            email: default_filer_email(),
            phone: default_filer_phone(),
            tax_office_code: default_tax_office_code(),
        }
    }
}

fn default_filer_nip() -> String {
    "6793194113".to_string()
}

fn default_filer_name() -> String {
    "Grey House sp. z o.o.".to_string()
}

fn default_filer_email() -> String {
    "info@greyhouse.es".to_string()
}

fn default_filer_phone() -> String {
    "608415900".to_string()
}

fn default_tax_office_code() -> u16 {
    1210
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "vatdesk=info,sea_orm=warn".to_string()
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
            .add_source(config::Environment::with_prefix("VATDESK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
