//! Analyzer configuration, loaded from TOML.
//!
//! Every section is optional; a missing file section falls back to its
//! defaults. Timeframe weights and risk tables are constants, not settings.

use crate::fundamentals::CompletenessThresholds;
use crate::scoring::Timeframe;
use crate::screening::ScreeningCriteria;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub edgar: EdgarConfig,
    pub identifier_cache: IdentifierCacheConfig,
    pub completeness: CompletenessThresholds,
    pub scoring: ScoringConfig,
    pub screening: ScreeningCriteria,
    pub logging: LoggingConfig,
}

/// SEC EDGAR endpoints. EDGAR rejects requests without a contact user agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgarConfig {
    pub user_agent: String,
    pub tickers_url: String,
    pub facts_base_url: String,
    pub timeout_secs: u64,
}

impl Default for EdgarConfig {
    fn default() -> Self {
        Self {
            user_agent: "marketscore research contact@example.com".into(),
            tickers_url: "https://www.sec.gov/files/company_tickers.json".into(),
            facts_base_url: "https://data.sec.gov/api/xbrl/companyfacts".into(),
            timeout_secs: 30,
        }
    }
}

impl EdgarConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifierCacheConfig {
    pub ttl_hours: u64,
}

impl Default for IdentifierCacheConfig {
    fn default() -> Self {
        Self { ttl_hours: 24 }
    }
}

impl IdentifierCacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours * 60 * 60)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub default_timeframe: Timeframe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".into(),
        }
    }
}

impl AnalyzerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let CompletenessThresholds {
            sparse_threshold,
            sec_only_threshold,
        } = self.completeness;
        for (name, value) in [
            ("sparse_threshold", sparse_threshold),
            ("sec_only_threshold", sec_only_threshold),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "completeness.{name} must be within 0..=100, got {value}"
                )));
            }
        }
        if sec_only_threshold >= sparse_threshold {
            return Err(ConfigError::Invalid(format!(
                "completeness.sec_only_threshold ({sec_only_threshold}) must be below sparse_threshold ({sparse_threshold})"
            )));
        }
        if self.identifier_cache.ttl_hours == 0 {
            return Err(ConfigError::Invalid("identifier_cache.ttl_hours must be positive".into()));
        }
        if self.screening.max_results == 0 {
            return Err(ConfigError::Invalid("screening.max_results must be positive".into()));
        }
        if !self.screening.min_gap_percent.is_finite() {
            return Err(ConfigError::Invalid("screening.min_gap_percent must be finite".into()));
        }
        if self.edgar.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("edgar.user_agent must not be empty".into()));
        }
        Ok(())
    }
}
