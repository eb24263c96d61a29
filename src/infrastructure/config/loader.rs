use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::SwarmConfig;

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid eligibility_threshold: {0}. Must be between 0 and 100")]
    InvalidEligibilityThreshold(f64),

    #[error("Invalid high_impact_threshold: {0}. Must be between the eligibility threshold and 100")]
    InvalidHighImpactThreshold(f64),

    #[error("Invalid pool_size: {0}. Must be between 1 and 100")]
    InvalidPoolSize(usize),

    #[error("Invalid dispersion_threshold: {0}. Must be between 0.0 and 1.0")]
    InvalidDispersionThreshold(f64),

    #[error("Invalid confidence band: prune_ceiling ({0}) must not exceed reinforce_floor ({1})")]
    InvalidConfidenceBand(f64, f64),

    #[error("Invalid pattern_cap: must be at least 1")]
    InvalidPatternCap,

    #[error("Database URL cannot be empty")]
    EmptyDatabaseUrl,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .hivemind/config.yaml (project config)
    /// 3. Environment variables (`HIVEMIND_`* prefix, highest priority)
    pub fn load() -> Result<SwarmConfig> {
        let config: SwarmConfig = Figment::new()
            .merge(Serialized::defaults(SwarmConfig::default()))
            .merge(Yaml::file(".hivemind/config.yaml"))
            .merge(Env::prefixed("HIVEMIND_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<SwarmConfig> {
        let config: SwarmConfig = Figment::new()
            .merge(Serialized::defaults(SwarmConfig::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading.
    pub fn validate(config: &SwarmConfig) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&config.eligibility_threshold) {
            return Err(ConfigError::InvalidEligibilityThreshold(
                config.eligibility_threshold,
            ));
        }

        if config.high_impact_threshold < config.eligibility_threshold
            || config.high_impact_threshold > 100.0
        {
            return Err(ConfigError::InvalidHighImpactThreshold(
                config.high_impact_threshold,
            ));
        }

        if config.pool_size == 0 || config.pool_size > 100 {
            return Err(ConfigError::InvalidPoolSize(config.pool_size));
        }

        if !(0.0..=1.0).contains(&config.dispersion_threshold) {
            return Err(ConfigError::InvalidDispersionThreshold(
                config.dispersion_threshold,
            ));
        }

        if config.prune_ceiling > config.reinforce_floor {
            return Err(ConfigError::InvalidConfidenceBand(
                config.prune_ceiling,
                config.reinforce_floor,
            ));
        }

        if config.pattern_cap == 0 {
            return Err(ConfigError::InvalidPatternCap);
        }

        if config.database.url.is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}
