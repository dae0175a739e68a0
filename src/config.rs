//! Layered settings: built-in defaults, then an optional TOML file, then
//! `COINBOARD__SECTION__KEY` environment variables (a `.env` file is honoured).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_CONFIG_FILE: &str = "coinboard.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
    pub metrics: MetricsSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiSettings {
    /// Root of the CoinGecko v3 API, without the `/coins/markets` path
    pub base_url: String,
    /// Optional demo-plan key sent as `x-cg-demo-api-key`
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UiSettings {
    /// Redraw interval of the terminal dashboard, in milliseconds
    pub tick_rate_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogSettings {
    pub filter: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricsSettings {
    pub port: u16,
}

impl Settings {
    /// Load settings from `path` (or `coinboard.toml` if present) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let builder = Self::defaults()?
            .add_source(file)
            .add_source(Environment::with_prefix("COINBOARD").separator("__"));
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Parse settings from a TOML string layered over the defaults.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let builder = Self::defaults()?.add_source(File::from_str(toml, FileFormat::Toml));
        Ok(builder.build()?.try_deserialize()?)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("ui.tick_rate_ms", 250)?
            .set_default("log.filter", "coinboard=info")?
            .set_default("metrics.port", 9000)?)
    }
}
