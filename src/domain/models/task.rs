//! Task and execution-result domain models.

use serde::{Deserialize, Serialize};

/// One unit of planned work. Created by the planner, consumed and discarded
/// by the executor; only its resulting memory record survives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// The subtask text.
    pub description: String,
    /// Name of the capability chosen to handle it. Always resolves to a
    /// live registration at planning time.
    pub assigned_agent: String,
    /// The originating goal string (back-reference).
    pub goal: String,
    /// Score carried from the originating request, gating execution and
    /// storage of the result.
    pub eligibility_score: f64,
}

/// What a worker returns for one task invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerOutput {
    pub outcome: String,
    /// 0.0-1.0; clamped by the executor.
    pub confidence: f64,
    pub succeeded: bool,
}

impl WorkerOutput {
    pub fn success(outcome: impl Into<String>, confidence: f64) -> Self {
        Self {
            outcome: outcome.into(),
            confidence: confidence.clamp(0.0, 1.0),
            succeeded: true,
        }
    }

    pub fn failure(outcome: impl Into<String>) -> Self {
        Self {
            outcome: outcome.into(),
            confidence: 0.0,
            succeeded: false,
        }
    }
}

/// Transient output of running one task. Failure is data here, not control
/// flow: a panicking or timed-out worker yields `succeeded == false` with
/// zero confidence instead of aborting the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Agent that ran (or was meant to run) the task.
    pub agent: String,
    /// The subtask text.
    pub task: String,
    pub outcome: String,
    pub confidence: f64,
    pub succeeded: bool,
    /// Wall-clock execution time; zero for tasks that never started.
    pub elapsed_ms: u64,
    /// Knowledge-store id of the durable trace, when the append was
    /// accepted by the eligibility gate.
    pub record_id: Option<i64>,
    /// Set for tasks cut off by the per-task timeout or the batch deadline.
    pub timed_out: bool,
}

impl ExecutionResult {
    /// Marker for a task that never ran before the batch deadline expired.
    pub fn deadline_expired(task: &Task) -> Self {
        Self {
            agent: task.assigned_agent.clone(),
            task: task.description.clone(),
            outcome: "timed out before execution".to_string(),
            confidence: 0.0,
            succeeded: false,
            elapsed_ms: 0,
            record_id: None,
            timed_out: true,
        }
    }
}
