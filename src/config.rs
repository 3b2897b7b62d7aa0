use crate::calc::comparison::REFERENCE_EPISODE_MINUTES;
use crate::calc::parse_locale;
use crate::catalog::client::JIKAN_BASE_URL;
use anyhow::{Context, Result};
use chrono::Locale;
use config::{Config as ConfigBuilder, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = ".animetime";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub comparison: ComparisonConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DisplayConfig {
    /// POSIX-style locale name used for time and date strings, e.g. `es_ES`
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_locale() -> String {
    "es_ES".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub debounce_ms: u64,
    pub min_query_len: usize,
    pub limit: u32,
    pub max_retries: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: JIKAN_BASE_URL.to_string(),
            debounce_ms: 500,
            min_query_len: 2,
            limit: 10,
            max_retries: 2,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ComparisonConfig {
    pub episode_minutes: u32,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            episode_minutes: REFERENCE_EPISODE_MINUTES,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StorageConfig {
    /// Optional override for the data directory (for testing)
    pub data_dir_override: Option<PathBuf>,
}

impl DisplayConfig {
    pub fn locale(&self) -> Result<Locale> {
        parse_locale(&self.locale)
    }
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_query_len == 0 {
            anyhow::bail!("catalog.min_query_len must be at least 1");
        }
        if self.limit == 0 || self.limit > 25 {
            anyhow::bail!("catalog.limit must be between 1 and 25");
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("catalog.base_url must be an http(s) URL");
        }
        Ok(())
    }
}

impl Config {
    /// Validate all configuration
    pub fn validate(&self) -> Result<()> {
        self.display.locale()?;
        self.catalog.validate()?;
        if self.comparison.episode_minutes == 0 {
            anyhow::bail!("comparison.episode_minutes must be greater than 0");
        }
        Ok(())
    }
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(home::home_dir()
        .context("Could not find home directory")?
        .join(APP_DIR_NAME))
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
    let loader = ConfigBuilder::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
        .build()
        .context("Failed to build config loader")?;

    loader
        .try_deserialize()
        .context("Failed to parse config file")
}

/// Load `~/.animetime/config.toml`, falling back to defaults when absent.
pub fn load() -> Result<Config> {
    let config_path = config_dir()?.join("config.toml");

    let config = if config_path.exists() {
        load_from_path(&config_path)?
    } else {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        Config::default()
    };

    config.validate()?;

    Ok(config)
}

pub fn save_to_path<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let toml_string = toml::to_string_pretty(config).context("Failed to serialize config")?;

    std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

    Ok(())
}
