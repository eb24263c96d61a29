//! Concurrent batch executor.
//!
//! Fans a batch of independent tasks out across a bounded pool of
//! execution units. Each unit invokes its assigned agent behind a panic
//! and (optional) timeout boundary, then appends the durable trace to the
//! knowledge store before releasing its pool slot. Worker failure is data:
//! a panicking, failing, or timed-out worker yields a zero-confidence
//! result instead of aborting the batch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, Semaphore};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::errors::{SwarmError, SwarmResult};
use crate::domain::models::{ExecutionResult, NewMemoryRecord, SwarmConfig, Task, WorkerOutput};
use crate::domain::ports::MemoryStore;
use crate::services::agent_registry::AgentRegistry;

/// Executor tuning knobs.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Cap on concurrent execution units; the effective pool is
    /// `min(batch size, pool_size)`.
    pub pool_size: usize,
    /// Optional per-task timeout. Absent by default.
    pub task_timeout: Option<Duration>,
    /// Optional whole-batch deadline; unfinished tasks get explicit
    /// timed-out markers and are not retried.
    pub batch_deadline: Option<Duration>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            pool_size: 5,
            task_timeout: None,
            batch_deadline: None,
        }
    }
}

impl From<&SwarmConfig> for ExecutorConfig {
    fn from(config: &SwarmConfig) -> Self {
        Self {
            pool_size: config.pool_size,
            task_timeout: config.task_timeout_secs.map(Duration::from_secs),
            batch_deadline: config.batch_deadline_secs.map(Duration::from_secs),
        }
    }
}

/// Cooperative cancellation signal for a batch.
///
/// In-flight tasks finish (no forced termination) but no new tasks are
/// dequeued once cancelled, and already-completed results stay recorded.
#[derive(Debug, Clone, Default)]
pub struct BatchCancellation {
    cancelled: Arc<AtomicBool>,
}

impl BatchCancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Runs planned batches over the shared agent registry and knowledge store.
pub struct BatchExecutor {
    registry: Arc<AgentRegistry>,
    store: Arc<dyn MemoryStore>,
    config: ExecutorConfig,
}

impl BatchExecutor {
    pub fn new(
        registry: Arc<AgentRegistry>,
        store: Arc<dyn MemoryStore>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            registry,
            store,
            config,
        }
    }

    /// Run a batch of independent tasks.
    ///
    /// The returned results carry no defined order relative to submission.
    /// Storage failures during result appends propagate as
    /// [`SwarmError::Storage`]; worker failures do not.
    pub async fn run_batch(
        &self,
        tasks: &[Task],
        cancel: &BatchCancellation,
    ) -> SwarmResult<Vec<ExecutionResult>> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let permits = Arc::new(Semaphore::new(self.config.pool_size.min(tasks.len())));
        let results: Arc<Mutex<Vec<(usize, ExecutionResult)>>> =
            Arc::new(Mutex::new(Vec::with_capacity(tasks.len())));
        let storage_failure: Arc<Mutex<Option<SwarmError>>> = Arc::new(Mutex::new(None));

        let mut handles = Vec::with_capacity(tasks.len());
        for (index, task) in tasks.iter().enumerate() {
            let task = task.clone();
            let permits = Arc::clone(&permits);
            let results = Arc::clone(&results);
            let storage_failure = Arc::clone(&storage_failure);
            let registry = Arc::clone(&self.registry);
            let store = Arc::clone(&self.store);
            let cancel = cancel.clone();
            let task_timeout = self.config.task_timeout;

            handles.push(tokio::spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };
                // Cancellation is checked at dequeue time only; a unit that
                // already started its task runs it to completion.
                if cancel.is_cancelled() {
                    debug!(task = %task.description, "batch cancelled, task skipped");
                    return;
                }

                let mut result = run_task(&registry, &task, task_timeout).await;
                match append_result(store.as_ref(), &task, &result).await {
                    Ok(record_id) => result.record_id = record_id,
                    Err(err) => {
                        let mut slot = storage_failure.lock().await;
                        if slot.is_none() {
                            *slot = Some(err);
                        }
                    }
                }
                results.lock().await.push((index, result));
            }));
        }

        let join_all = futures::future::join_all(handles);

        let deadline_expired = match self.config.batch_deadline {
            Some(deadline) => timeout(deadline, join_all).await.is_err(),
            None => {
                join_all.await;
                false
            }
        };

        if let Some(err) = storage_failure.lock().await.take() {
            return Err(err);
        }

        // One lock acquisition for both the snapshot and the timed-out
        // markers, so a task finishing around the deadline is reported
        // either as completed or as marked, never both.
        let completed = results.lock().await;
        let mut out: Vec<ExecutionResult> = completed.iter().map(|(_, r)| r.clone()).collect();

        if deadline_expired {
            warn!(
                completed = out.len(),
                total = tasks.len(),
                "batch deadline expired"
            );
            let done: std::collections::HashSet<usize> =
                completed.iter().map(|(i, _)| *i).collect();
            for (index, task) in tasks.iter().enumerate() {
                if !done.contains(&index) {
                    out.push(ExecutionResult::deadline_expired(task));
                }
            }
        }

        Ok(out)
    }
}

/// Invoke a task's assigned agent behind the panic/timeout boundary.
async fn run_task(
    registry: &AgentRegistry,
    task: &Task,
    task_timeout: Option<Duration>,
) -> ExecutionResult {
    let started = Instant::now();

    let Some(registration) = registry.resolve(&task.assigned_agent).await else {
        // Planner guarantees live assignments; treat a stale one as a
        // failed task rather than aborting the batch.
        return ExecutionResult {
            agent: task.assigned_agent.clone(),
            task: task.description.clone(),
            outcome: format!("agent '{}' not registered", task.assigned_agent),
            confidence: 0.0,
            succeeded: false,
            elapsed_ms: 0,
            record_id: None,
            timed_out: false,
        };
    };

    let worker = Arc::clone(&registration.worker);
    let owned_task = task.clone();
    let mut invocation = tokio::spawn(async move { worker.execute(&owned_task).await });

    let (output, timed_out) = match task_timeout {
        Some(limit) => match timeout(limit, &mut invocation).await {
            Ok(joined) => (join_to_output(joined, task), false),
            Err(_) => {
                // A misbehaving worker must not keep the pool slot's
                // resources; the per-task timeout is opt-in preemption.
                invocation.abort();
                warn!(agent = %task.assigned_agent, task = %task.description, "worker timed out");
                (WorkerOutput::failure("worker timed out"), true)
            }
        },
        None => (join_to_output(invocation.await, task), false),
    };

    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    ExecutionResult {
        agent: task.assigned_agent.clone(),
        task: task.description.clone(),
        outcome: output.outcome,
        confidence: output.confidence.clamp(0.0, 1.0),
        succeeded: output.succeeded,
        elapsed_ms,
        record_id: None,
        timed_out,
    }
}

/// Collapse a join outcome into worker output; a panicking worker is a
/// failed result, not a batch failure.
fn join_to_output(
    joined: Result<WorkerOutput, tokio::task::JoinError>,
    task: &Task,
) -> WorkerOutput {
    match joined {
        Ok(output) => output,
        Err(err) => {
            warn!(agent = %task.assigned_agent, task = %task.description, %err, "worker panicked");
            WorkerOutput::failure("worker panicked")
        }
    }
}

/// Write the durable trace for one result. Returns the record id, or `None`
/// when the store's eligibility gate rejected the write.
async fn append_result(
    store: &dyn MemoryStore,
    task: &Task,
    result: &ExecutionResult,
) -> SwarmResult<Option<i64>> {
    let record = NewMemoryRecord::new(&task.description, &result.outcome)
        .with_eligibility(task.eligibility_score)
        .with_confidence(result.confidence)
        .with_metadata("agent", result.agent.clone())
        .with_metadata("goal", task.goal.clone())
        .with_metadata("succeeded", result.succeeded);
    store.append(record).await
}
