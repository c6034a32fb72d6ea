//! Configuration loading from TOML with environment variable overrides.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every field has a default so a partial (or empty) file is valid.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::engine::{EngineConfig, MAX_MODEL_YEAR, MIN_MODEL_YEAR};

/// Default configuration file path.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Environment variable naming an alternate configuration file.
pub const CONFIG_PATH_ENV: &str = "EQUIPVAL_CONFIG";

/// Environment variable overriding `data.book_path`.
pub const BOOK_PATH_ENV: &str = "EQUIPVAL_BOOK_PATH";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub valuation: ValuationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Path to the JSON reference table.
    #[serde(default = "default_book_path")]
    pub book_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            book_path: default_book_path(),
        }
    }
}

fn default_book_path() -> String {
    "data/Book.json".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ValuationConfig {
    #[serde(default = "default_min_year")]
    pub min_model_year: i32,
    #[serde(default = "default_max_year")]
    pub max_model_year: i32,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            min_model_year: MIN_MODEL_YEAR,
            max_model_year: MAX_MODEL_YEAR,
        }
    }
}

fn default_min_year() -> i32 {
    MIN_MODEL_YEAR
}

fn default_max_year() -> i32 {
    MAX_MODEL_YEAR
}

impl ValuationConfig {
    /// Reject an empty year window.
    pub fn validate(&self) -> Result<()> {
        if self.min_model_year > self.max_model_year {
            anyhow::bail!(
                "valuation.min_model_year ({}) is after valuation.max_model_year ({})",
                self.min_model_year,
                self.max_model_year
            );
        }
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            min_model_year: self.min_model_year,
            max_model_year: self.max_model_year,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse and validate configuration text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.valuation.validate()?;
        Ok(config)
    }

    /// Apply environment overrides (currently only the book path).
    pub fn apply_env(&mut self) {
        if let Ok(path) = std::env::var(BOOK_PATH_ENV) {
            if !path.trim().is_empty() {
                self.data.book_path = path;
            }
        }
    }

    /// Config path from `EQUIPVAL_CONFIG`, falling back to `config.toml`.
    pub fn resolve_path() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string())
    }
}
