use crate::core::rate::Currency;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

fn default_update_interval_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct PairConfig {
    pub base: Currency,
    pub quote: Currency,
}

impl Default for PairConfig {
    fn default() -> Self {
        PairConfig {
            base: Currency::Usdt,
            quote: Currency::Trx,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OkxProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BinanceProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub okx: Option<OkxProviderConfig>,
    pub binance: Option<BinanceProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            okx: Some(OkxProviderConfig {
                base_url: "https://www.okx.com".to_string(),
            }),
            binance: Some(BinanceProviderConfig {
                base_url: "https://api.binance.com".to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Pair whose rate is kept up to date.
    #[serde(default)]
    pub pair: PairConfig,
    /// Pins the rate outright; no provider is contacted while set.
    pub fixed_rate: Option<Decimal>,
    /// Operator-supplied live rate, checked after `fixed_rate`.
    pub override_rate: Option<Decimal>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Optional outbound HTTP proxy URL for provider requests.
    pub web_proxy: Option<String>,
    #[serde(default = "default_update_interval_secs")]
    pub update_interval_secs: u64,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "fxsync")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("in", "codito", "fxsync")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
