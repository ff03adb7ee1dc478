use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Host configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Websocket listener host address
    #[validate(length(min = 1, message = "websocket host cannot be empty"))]
    pub ws_host: String,

    /// Websocket listener port (1-65535)
    #[validate(range(
        min = 1,
        max = 65535,
        message = "websocket port must be between 1 and 65535"
    ))]
    pub ws_port: u16,

    /// UDP host address for the TUIO marker adapter
    #[validate(length(min = 1, message = "UDP host cannot be empty"))]
    pub udp_host: String,

    /// UDP port for the TUIO marker adapter (1-65535)
    #[validate(range(
        min = 1,
        max = 65535,
        message = "UDP port must be between 1 and 65535"
    ))]
    pub udp_port: u16,

    /// Path of the rule file, reloaded when its mtime changes
    #[validate(length(min = 1, message = "rules file path cannot be empty"))]
    pub rules_file: String,

    /// Soft cap on reactive drains per ingestion message
    #[validate(range(
        min = 1,
        max = 10000,
        message = "drain cap must be between 1 and 10000"
    ))]
    pub max_drains_per_tick: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ws_host: "127.0.0.1".to_string(),
            ws_port: 8765,
            udp_host: "127.0.0.1".to_string(),
            udp_port: 8766,
            rules_file: "app.txt".to_string(),
            max_drains_per_tick: 64,
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            ws_host: env::var("TINYLAND_WS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            ws_port: parse_env_var("TINYLAND_WS_PORT", "8765")?,
            udp_host: env::var("TINYLAND_UDP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            udp_port: parse_env_var("TINYLAND_UDP_PORT", "8766")?,
            rules_file: env::var("TINYLAND_RULES").unwrap_or_else(|_| "app.txt".to_string()),
            max_drains_per_tick: parse_env_var("TINYLAND_MAX_DRAINS", "64")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let config = Self {
            ws_host: cli.ws_host,
            ws_port: cli.ws_port,
            udp_host: cli.udp_host,
            udp_port: cli.udp_port,
            rules_file: cli.rules_file,
            max_drains_per_tick: cli.max_drains_per_tick,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Parse {
            field: "config file".to_string(),
            value: path.as_ref().display().to_string(),
            source: Box::new(e),
        })?;
        let config: ServerConfig =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
                field: "config file".to_string(),
                value: path.as_ref().display().to_string(),
                source: Box::new(e),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn ws_addr(&self) -> String {
        format!("{}:{}", self.ws_host, self.ws_port)
    }

    pub fn udp_addr(&self) -> String {
        format!("{}:{}", self.udp_host, self.udp_port)
    }
}

/// CLI argument bundle, converted into a validated [`ServerConfig`]
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub ws_host: String,
    pub ws_port: u16,
    pub udp_host: String,
    pub udp_port: u16,
    pub rules_file: String,
    pub max_drains_per_tick: u32,
}

fn parse_env_var<T>(name: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>().map_err(|e| ConfigError::Parse {
        field: name.to_string(),
        value: raw,
        source: Box::new(e),
    })
}
