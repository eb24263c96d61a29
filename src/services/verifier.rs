//! Batch verification by confidence dispersion.
//!
//! This is a statistical heuristic, not semantic comparison: a high spread
//! among confidence values is read as "the results disagree", regardless of
//! what the results actually say. The converse limitation is accepted: a
//! batch where every worker agrees but is confidently wrong passes
//! verification.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::Mutex;
use tracing::warn;

use crate::domain::errors::SwarmResult;
use crate::domain::models::ExecutionResult;
use crate::domain::ports::MemoryStore;

/// Outcome of verifying one batch.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VerificationReport {
    /// Population standard deviation of the batch confidences, capped at 1.0.
    pub dispersion: f64,
    /// Whether the orchestration layer should re-submit the batch once.
    pub auto_retry: bool,
}

/// Lesson logged when a batch is flagged. Kept in memory for inspection,
/// never written to the durable knowledge store.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FailureLesson {
    pub reason: String,
    pub dispersion: f64,
    pub occurred_at: DateTime<Utc>,
}

/// Advisory result of checking an action against similar past records.
#[derive(Debug, Clone)]
pub struct HistoryCheck {
    /// How many similar records were sampled.
    pub sampled: usize,
    /// Share of sampled records with confidence below 0.5.
    pub failure_rate: f64,
    /// Whether the failure rate exceeds the dispersion threshold.
    pub risky: bool,
}

/// Inspects completed batches for cross-result disagreement.
pub struct Verifier {
    store: Arc<dyn MemoryStore>,
    dispersion_threshold: f64,
    lessons: Mutex<Vec<FailureLesson>>,
}

impl Verifier {
    pub fn new(store: Arc<dyn MemoryStore>, dispersion_threshold: f64) -> Self {
        Self {
            store,
            dispersion_threshold,
            lessons: Mutex::new(Vec::new()),
        }
    }

    /// Verify a completed batch. Flags it for a single automatic retry when
    /// the confidence dispersion exceeds the threshold, logging a lesson.
    pub fn verify(&self, results: &[ExecutionResult]) -> VerificationReport {
        let confidences: Vec<f64> = results.iter().map(|r| r.confidence).collect();
        let dispersion = population_std_dev(&confidences).min(1.0);
        let auto_retry = dispersion > self.dispersion_threshold;

        if auto_retry {
            warn!(dispersion, threshold = self.dispersion_threshold, "high-dispersion batch flagged");
            let lesson = FailureLesson {
                reason: "high-dispersion".to_string(),
                dispersion,
                occurred_at: Utc::now(),
            };
            if let Ok(mut lessons) = self.lessons.lock() {
                lessons.push(lesson);
            }
        }

        VerificationReport {
            dispersion,
            auto_retry,
        }
    }

    /// Cross-check an action against similar past records. Advisory only:
    /// callers decide what to do with a risky history.
    pub async fn check_history(&self, action: &str, top_k: usize) -> SwarmResult<HistoryCheck> {
        let similar = self.store.recall_similar(action, top_k).await?;
        let sampled = similar.len();
        let failures = similar.iter().filter(|r| r.confidence < 0.5).count();
        let failure_rate = if sampled == 0 {
            0.0
        } else {
            failures as f64 / sampled as f64
        };
        Ok(HistoryCheck {
            sampled,
            failure_rate,
            risky: failure_rate > self.dispersion_threshold,
        })
    }

    /// Snapshot of the in-memory failure log.
    pub fn lessons(&self) -> Vec<FailureLesson> {
        self.lessons.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

/// Population standard deviation; 0.0 for fewer than two values.
fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::NullMemoryStore;

    fn result_with_confidence(confidence: f64) -> ExecutionResult {
        ExecutionResult {
            agent: "a".to_string(),
            task: "t".to_string(),
            outcome: "o".to_string(),
            confidence,
            succeeded: true,
            elapsed_ms: 1,
            record_id: None,
            timed_out: false,
        }
    }

    fn verifier() -> Verifier {
        Verifier::new(Arc::new(NullMemoryStore::new()), 0.10)
    }

    #[test]
    fn identical_confidences_have_zero_dispersion() {
        let v = verifier();
        let batch: Vec<_> = (0..4).map(|_| result_with_confidence(0.9)).collect();
        let report = v.verify(&batch);
        assert!(report.dispersion.abs() < f64::EPSILON);
        assert!(!report.auto_retry);
        assert!(v.lessons().is_empty());
    }

    #[test]
    fn spread_confidences_trigger_retry_and_lesson() {
        let v = verifier();
        let batch = vec![
            result_with_confidence(1.0),
            result_with_confidence(1.0),
            result_with_confidence(0.0),
        ];
        let report = v.verify(&batch);
        // std dev of [1, 1, 0] is sqrt(2)/3 ≈ 0.471
        assert!((report.dispersion - 0.471).abs() < 0.001);
        assert!(report.auto_retry);

        let lessons = v.lessons();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].reason, "high-dispersion");
    }

    #[test]
    fn single_result_has_zero_dispersion() {
        let report = verifier().verify(&[result_with_confidence(0.3)]);
        assert!(report.dispersion.abs() < f64::EPSILON);
        assert!(!report.auto_retry);
    }

    #[test]
    fn empty_batch_has_zero_dispersion() {
        let report = verifier().verify(&[]);
        assert!(report.dispersion.abs() < f64::EPSILON);
        assert!(!report.auto_retry);
    }

    #[tokio::test]
    async fn empty_history_is_not_risky() {
        let check = verifier().check_history("anything", 5).await.unwrap();
        assert_eq!(check.sampled, 0);
        assert!(!check.risky);
    }
}
