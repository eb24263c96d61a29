//! Domain errors for the hivemind swarm core.

use thiserror::Error;

/// Errors surfaced by the swarm core's public entry points.
///
/// Task-level worker failures are *not* represented here: a failed or
/// panicking worker is absorbed into its [`ExecutionResult`] so one bad
/// agent cannot abort a whole cycle. Only gate, storage, and consensus
/// failures propagate as hard errors.
///
/// [`ExecutionResult`]: crate::domain::models::ExecutionResult
#[derive(Debug, Error)]
pub enum SwarmError {
    /// The access gate rejected the eligibility score. Non-retryable
    /// without raising the score.
    #[error("eligibility score {score:.1} below threshold {threshold:.1}")]
    Ineligible { score: f64, threshold: f64 },

    /// Knowledge store I/O failure. Propagated, never swallowed: losing a
    /// durable write silently would corrupt the evolution signal.
    #[error("storage failure: {0}")]
    Storage(String),

    /// Two consecutive high-dispersion verifications for the same batch.
    /// Surfaced after the single automatic retry instead of retrying again.
    #[error("low consensus after retry: dispersion {dispersion:.3}")]
    LowConsensus { dispersion: f64 },

    /// An individual agent invocation failed in a way that could not be
    /// absorbed into a result (e.g. the agent is not registered).
    #[error("worker '{agent}' failed: {reason}")]
    Worker { agent: String, reason: String },
}

pub type SwarmResult<T> = Result<T, SwarmError>;

impl From<sqlx::Error> for SwarmError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for SwarmError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::Storage(format!("migration failed: {err}"))
    }
}

impl From<serde_json::Error> for SwarmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(format!("serialization failed: {err}"))
    }
}
