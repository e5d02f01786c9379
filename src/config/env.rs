use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoint: EndpointConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub timezone: String,
}

#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub base_url: Url,
    pub predict_path: String,
    pub form_action: String,
    /// `None` means requests may wait indefinitely.
    pub request_timeout: Option<Duration>,
}

impl EndpointConfig {
    pub fn predict_url(&self) -> Result<Url, ConfigError> {
        join_url(&self.base_url, &self.predict_path)
    }

    pub fn form_action_url(&self) -> Result<Url, ConfigError> {
        join_url(&self.base_url, &self.form_action)
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
    pub data_dir: String,
    pub storage_filename: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid url in {key}: {value}")]
    InvalidUrl { key: &'static str, value: String },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

fn join_url(base: &Url, path: &str) -> Result<Url, ConfigError> {
    base.join(path).map_err(|_| ConfigError::InvalidUrl {
        key: "PHISHGUARD_URL",
        value: format!("{base}{path}"),
    })
}
