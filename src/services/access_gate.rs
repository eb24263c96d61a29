//! Eligibility gate every public entry point passes first.

use std::collections::HashSet;

use crate::domain::errors::{SwarmError, SwarmResult};
use crate::domain::models::SwarmConfig;

/// Gate class for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationClass {
    /// Gated at the eligibility threshold (default 95).
    Standard,
    /// Gated at the stricter high-impact threshold (default 99.9).
    HighImpact,
}

/// A single threshold check over a numeric eligibility score.
///
/// No side effects beyond the check: on failure the whole batch is aborted
/// before anything is written to the knowledge store.
#[derive(Debug, Clone)]
pub struct AccessGate {
    threshold: f64,
    high_impact_threshold: f64,
    high_impact_operations: HashSet<String>,
}

impl AccessGate {
    pub fn new(config: &SwarmConfig) -> Self {
        Self {
            threshold: config.eligibility_threshold,
            high_impact_threshold: config.high_impact_threshold,
            high_impact_operations: config.high_impact_operations.iter().cloned().collect(),
        }
    }

    /// The standard eligibility threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Check a score against the given class. A score exactly at the
    /// threshold passes; non-finite scores never do.
    pub fn authorize(&self, score: f64, class: OperationClass) -> SwarmResult<()> {
        let threshold = match class {
            OperationClass::Standard => self.threshold,
            OperationClass::HighImpact => self.high_impact_threshold,
        };
        // NaN compares false against any threshold and would slip through.
        if !score.is_finite() || score < threshold {
            return Err(SwarmError::Ineligible { score, threshold });
        }
        Ok(())
    }

    /// Check a score for a named operation, using the high-impact threshold
    /// when the operation is designated high-impact in configuration.
    pub fn authorize_operation(&self, operation: &str, score: f64) -> SwarmResult<()> {
        let class = if self.high_impact_operations.contains(operation) {
            OperationClass::HighImpact
        } else {
            OperationClass::Standard
        };
        self.authorize(score, class)
    }
}
