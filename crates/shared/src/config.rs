//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration. When absent the in-memory store is used.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    /// Token verification configuration.
    pub jwt: JwtSettings,
    /// Text generation service used by the assistant endpoint.
    #[serde(default)]
    pub assistant: Option<AssistantConfig>,
    /// Mutation engine tuning.
    #[serde(default)]
    pub ledger: LedgerConfig,
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

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
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

/// Token verification settings.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key shared with the identity provider.
    pub secret: String,
    /// Access token lifetime in minutes, used when issuing tokens locally.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_minutes: i64,
}

fn default_access_token_expiry() -> i64 {
    15
}

impl From<&JwtSettings> for crate::jwt::JwtConfig {
    fn from(settings: &JwtSettings) -> Self {
        Self {
            secret: settings.secret.clone(),
            access_token_expires_minutes: settings.access_token_expiry_minutes,
        }
    }
}

/// Text generation service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// Full URL of the generation endpoint.
    #[serde(default = "default_assistant_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds.
    #[serde(default = "default_assistant_timeout")]
    pub timeout_secs: u64,
    /// Response length preset understood by the service, e.g. `"long"`.
    #[serde(default = "default_response_length")]
    pub response_length: String,
    /// Sampling temperature as a decimal string, e.g. `"0.4"`.
    #[serde(default = "default_temperature")]
    pub temperature: String,
}

fn default_assistant_endpoint() -> String {
    "http://127.0.0.1:8000/api/generate".to_string()
}

fn default_assistant_timeout() -> u64 {
    30
}

fn default_response_length() -> String {
    "long".to_string()
}

fn default_temperature() -> String {
    "0.4".to_string()
}

/// Mutation engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// How many times a mutation is retried after a concurrent write.
    #[serde(default = "default_max_conflict_retries")]
    pub max_conflict_retries: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: default_max_conflict_retries(),
        }
    }
}

fn default_max_conflict_retries() -> u32 {
    3
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later overriding earlier: `config/default`, `config/{RUN_MODE}`,
    /// then `FINTRACK__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FINTRACK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
