//! Configuration structures for the swarm core.

use serde::{Deserialize, Serialize};

/// Main configuration for the swarm orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SwarmConfig {
    /// Eligibility threshold (0-100) every entry point must pass.
    #[serde(default = "default_eligibility_threshold")]
    pub eligibility_threshold: f64,

    /// Stricter threshold applied to operations listed in
    /// `high_impact_operations`.
    #[serde(default = "default_high_impact_threshold")]
    pub high_impact_threshold: f64,

    /// Operation names gated at the high-impact threshold.
    #[serde(default)]
    pub high_impact_operations: Vec<String>,

    /// Cap on concurrent execution units per batch.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Confidence dispersion above which a batch is flagged for retry.
    #[serde(default = "default_dispersion_threshold")]
    pub dispersion_threshold: f64,

    /// Records at or above `max(reinforce_floor, batch mean)` confidence
    /// become reinforced patterns.
    #[serde(default = "default_reinforce_floor")]
    pub reinforce_floor: f64,

    /// Records strictly below this confidence are pruned.
    #[serde(default = "default_prune_ceiling")]
    pub prune_ceiling: f64,

    /// Most recent reinforced patterns kept for planner biasing.
    #[serde(default = "default_pattern_cap")]
    pub pattern_cap: usize,

    /// Optional per-task timeout. No timeout by default: workers are
    /// trusted collaborators unless configured otherwise.
    #[serde(default)]
    pub task_timeout_secs: Option<u64>,

    /// Optional deadline for a whole batch; unfinished tasks get explicit
    /// timed-out markers.
    #[serde(default)]
    pub batch_deadline_secs: Option<u64>,

    /// Interval for the periodic full-store evolution sweep. Disabled when
    /// unset.
    #[serde(default)]
    pub sweep_interval_secs: Option<u64>,

    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

const fn default_eligibility_threshold() -> f64 {
    95.0
}

const fn default_high_impact_threshold() -> f64 {
    99.9
}

const fn default_pool_size() -> usize {
    5
}

const fn default_dispersion_threshold() -> f64 {
    0.10
}

const fn default_reinforce_floor() -> f64 {
    0.8
}

const fn default_prune_ceiling() -> f64 {
    0.5
}

const fn default_pattern_cap() -> usize {
    10
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            eligibility_threshold: default_eligibility_threshold(),
            high_impact_threshold: default_high_impact_threshold(),
            high_impact_operations: vec![],
            pool_size: default_pool_size(),
            dispersion_threshold: default_dispersion_threshold(),
            reinforce_floor: default_reinforce_floor(),
            prune_ceiling: default_prune_ceiling(),
            pattern_cap: default_pattern_cap(),
            task_timeout_secs: None,
            batch_deadline_secs: None,
            sweep_interval_secs: None,
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// `SQLite` database URL (e.g. "sqlite:.hivemind/memory.db").
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "sqlite:.hivemind/memory.db".to_string()
}

const fn default_max_connections() -> u32 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
