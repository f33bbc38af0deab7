//! Program configuration: optional TOML file, then environment, then CLI overrides.

use std::path::Path;

use alloy::primitives::Address;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    consts::DEFAULT_VAR_THRESHOLD, parse_data_provider, prelude::*, AlertConfig, BaseUrl, Error,
    EthPersonalSigner, RecordRange,
};

pub const ENV_PRIVATE_KEY: &str = "PRIVATE_KEY";
pub const ENV_PROVIDER_URL: &str = "PROVIDER_URL";
pub const ENV_PROVIDER_ADDRESS: &str = "PROVIDER_ADDRESS";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Default, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Gateway: mainnet, staging, localhost or a URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Prefer the PRIVATE_KEY env var
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// Owner of the streams being read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_address: Option<String>,
}

impl std::fmt::Debug for NetworkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkConfig")
            .field("base_url", &self.base_url)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "<redacted>"),
            )
            .field("provider_address", &self.provider_address)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    #[serde(default = "default_from")]
    pub from: NaiveDate,
    #[serde(default = "default_to")]
    pub to: NaiveDate,
}

fn default_from() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default()
}

fn default_to() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 31).unwrap_or_default()
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            from: default_from(),
            to: default_to(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlertsConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_VAR_THRESHOLD
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Read `path` when it exists, otherwise start from defaults.
    pub fn load(path: Option<&Path>) -> Result<AppConfig> {
        match path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
                toml::from_str(&content)
                    .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
            }
            _ => Ok(AppConfig::default()),
        }
    }

    /// Overlay PRIVATE_KEY, PROVIDER_URL and PROVIDER_ADDRESS from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay the environment through `lookup`. Empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_PRIVATE_KEY) {
            self.network.private_key = Some(v);
        }
        if let Some(v) = get(ENV_PROVIDER_URL) {
            self.network.base_url = Some(v);
        }
        if let Some(v) = get(ENV_PROVIDER_ADDRESS) {
            self.network.provider_address = Some(v);
        }
    }

    pub fn require_private_key(&self) -> Result<&str> {
        self.network
            .private_key
            .as_deref()
            .ok_or(Error::MissingEnv(ENV_PRIVATE_KEY))
    }

    pub fn require_provider_url(&self) -> Result<&str> {
        self.network
            .base_url
            .as_deref()
            .ok_or(Error::MissingEnv(ENV_PROVIDER_URL))
    }

    pub fn require_provider_address(&self) -> Result<&str> {
        self.network
            .provider_address
            .as_deref()
            .ok_or(Error::MissingEnv(ENV_PROVIDER_ADDRESS))
    }

    pub fn signer(&self) -> Result<EthPersonalSigner> {
        EthPersonalSigner::from_hex(self.require_private_key()?)
    }

    /// Configured gateway, or `fallback` when none is set.
    pub fn base_url_or(&self, fallback: BaseUrl) -> Result<BaseUrl> {
        match self.network.base_url.as_deref() {
            Some(url) => BaseUrl::parse(url),
            None => Ok(fallback),
        }
    }

    pub fn base_url(&self) -> Result<BaseUrl> {
        BaseUrl::parse(self.require_provider_url()?)
    }

    pub fn provider_address(&self) -> Result<Address> {
        parse_data_provider(self.require_provider_address()?)
    }

    pub fn query_range(&self) -> Result<RecordRange> {
        RecordRange::dates(self.query.from, self.query.to)
    }

    pub fn alert_config(&self) -> AlertConfig {
        AlertConfig {
            threshold: self.alerts.threshold,
        }
    }
}
