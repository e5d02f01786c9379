use std::{env, time::Duration};

use url::Url;

use super::env::{AppConfig, ConfigError, DirectoryConfig, EndpointConfig, LoggingConfig};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_base = env::var("PHISHGUARD_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw_base).map_err(|_| ConfigError::InvalidUrl {
            key: "PHISHGUARD_URL",
            value: raw_base.clone(),
        })?;

        let timeout_ms = match env::var("REQUEST_TIMEOUT_MS") {
            Ok(value) => value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: "REQUEST_TIMEOUT_MS",
                value,
            })?,
            Err(_) => DEFAULT_TIMEOUT_MS,
        };

        let endpoint = EndpointConfig {
            base_url,
            predict_path: env::var("PREDICT_PATH").unwrap_or_else(|_| "/predict".to_string()),
            form_action: env::var("FORM_ACTION").unwrap_or_else(|_| "/".to_string()),
            request_timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
        };

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            storage_filename: env::var("STORAGE_FILENAME")
                .unwrap_or_else(|_| "local_storage.json".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        let timezone = env::var("PHISHGUARD_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());

        Ok(Self {
            endpoint,
            directories,
            logging,
            timezone,
        })
    }
}
