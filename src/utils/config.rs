use crate::error::FlipError;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub matching: MatchingConfig,
    pub outreach: OutreachConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

/// Flip criteria and matching strategy selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub min_hold_days: i64,
    pub max_hold_days: i64,
    pub min_profit: Decimal,
    pub max_profit: Decimal,
    /// Only pair a purchase with a resale by the same party
    pub require_same_party: bool,
    /// Strategy id used for counties without an override
    pub strategy: String,
    /// County name (case-insensitive) -> strategy id
    pub county_strategies: BTreeMap<String, String>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_hold_days: 30,
            max_hold_days: 365,
            min_profit: Decimal::from(70_000),
            max_profit: Decimal::from(150_000),
            require_same_party: true,
            strategy: "all_pairs".to_string(),
            county_strategies: BTreeMap::new(),
        }
    }
}

impl MatchingConfig {
    /// Reject inverted or negative ranges
    pub fn validate(&self) -> crate::Result<()> {
        if self.min_hold_days < 0 {
            return Err(FlipError::Config(format!(
                "min_hold_days must not be negative (got {})",
                self.min_hold_days
            )));
        }
        if self.min_profit < Decimal::ZERO {
            return Err(FlipError::Config(format!(
                "min_profit must not be negative (got {})",
                self.min_profit
            )));
        }
        if self.min_hold_days > self.max_hold_days {
            return Err(FlipError::Config(format!(
                "min_hold_days {} exceeds max_hold_days {}",
                self.min_hold_days, self.max_hold_days
            )));
        }
        if self.min_profit > self.max_profit {
            return Err(FlipError::Config(format!(
                "min_profit {} exceeds max_profit {}",
                self.min_profit, self.max_profit
            )));
        }
        Ok(())
    }

    pub fn hold_in_range(&self, hold_days: i64) -> bool {
        (self.min_hold_days..=self.max_hold_days).contains(&hold_days)
    }

    pub fn profit_in_range(&self, profit: Decimal) -> bool {
        profit >= self.min_profit && profit <= self.max_profit
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutreachConfig {
    /// Investors with at least this many flips are tagged as high loan need
    pub high_need_min_flips: usize,
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self { high_need_min_flips: 6 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub recent_flips: usize,
    pub top_investors: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            recent_flips: 100,
            top_investors: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub output: String,
    pub file_path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: "pretty".to_string(),
            file_path: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject inverted or negative thresholds
    pub fn validate(&self) -> crate::Result<()> {
        self.matching.validate()
    }

    /// Load from environment variable or default path
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_FILE")
            .unwrap_or_else(|_| "config/default.toml".to_string());
        Self::from_file(path)
    }
}
