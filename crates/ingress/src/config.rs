use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::streaming::DEFAULT_CHUNK_SIZE;
use crate::validation::{Endpoint, parse_host_port};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct StreamingConfig {
    /// Bytes requested per chunk while piping a body.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Maximum number of bytes a single body may carry.
    #[serde(default = "default_size_limit")]
    pub size_limit: u64,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        StreamingConfig {
            chunk_size: default_chunk_size(),
            size_limit: default_size_limit(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// `host:port` the service is reachable at. IPv6 literals must be bracketed.
    pub endpoint: String,
    #[serde(default)]
    pub streaming: StreamingConfig,
}

impl AppConfig {
    /// The configured endpoint, parsed.
    pub fn endpoint(&self) -> Result<Endpoint, ConfigError> {
        parse_host_port(&self.endpoint).map_err(|e| ConfigError::Validation(e.to_string()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint()?;
        if self.streaming.chunk_size == 0 {
            return Err(ConfigError::Validation(
                "streaming.chunk_size must be > 0".into(),
            ));
        }
        if self.streaming.size_limit == 0 {
            return Err(ConfigError::Validation(
                "streaming.size_limit must be > 0".into(),
            ));
        }
        Ok(())
    }
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_size_limit() -> u64 {
    1024 * 1024 * 1024
}

/// Load configuration from `config.yaml` (if present) + environment overrides.
///
/// Any environment variable matching the key path separated by double underscores
/// (e.g. `STREAMING__SIZE_LIMIT`) overrides the file value.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from("config.yaml")
}

/// Same as [`load_config`] with an explicit file path. The file is optional.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};
    let cfg = Config::builder()
        .add_source(File::from(path.as_ref()).required(false))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    app.validate()?;
    Ok(app)
}

/// Convenience helper for binaries that want to abort on bad configuration.
pub fn load_config_or_panic() -> AppConfig {
    match load_config() {
        Ok(c) => c,
        Err(e) => panic!("Failed to load configuration: {e}"),
    }
}
