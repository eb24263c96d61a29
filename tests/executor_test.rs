//! Executor boundary tests: panics, timeouts, cancellation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hivemind::domain::models::{Task, WorkerOutput};
use hivemind::domain::ports::{NullMemoryStore, Worker};
use hivemind::services::{AgentRegistry, BatchCancellation, BatchExecutor, ExecutorConfig};

fn task_for(agent: &str, description: &str) -> Task {
    Task {
        description: description.to_string(),
        assigned_agent: agent.to_string(),
        goal: "test goal".to_string(),
        eligibility_score: 100.0,
    }
}

struct PanickingWorker;

#[async_trait]
impl Worker for PanickingWorker {
    async fn execute(&self, _task: &Task) -> WorkerOutput {
        panic!("worker blew up");
    }
}

struct SlowWorker {
    delay: Duration,
}

#[async_trait]
impl Worker for SlowWorker {
    async fn execute(&self, _task: &Task) -> WorkerOutput {
        tokio::time::sleep(self.delay).await;
        WorkerOutput::success("finally done", 0.9)
    }
}

struct SteadyWorker;

#[async_trait]
impl Worker for SteadyWorker {
    async fn execute(&self, _task: &Task) -> WorkerOutput {
        WorkerOutput::success("done", 0.9)
    }
}

async fn executor_with(
    agents: &[(&str, Arc<dyn Worker>)],
    config: ExecutorConfig,
) -> BatchExecutor {
    let registry = Arc::new(AgentRegistry::new());
    for (name, worker) in agents {
        registry.register(*name, "general", Arc::clone(worker)).await;
    }
    BatchExecutor::new(registry, Arc::new(NullMemoryStore::new()), config)
}

#[tokio::test]
async fn panicking_worker_becomes_failed_result() {
    let executor = executor_with(
        &[
            ("bomb", Arc::new(PanickingWorker)),
            ("steady", Arc::new(SteadyWorker)),
        ],
        ExecutorConfig::default(),
    )
    .await;

    let tasks = vec![task_for("bomb", "explode"), task_for("steady", "work")];
    let results = executor
        .run_batch(&tasks, &BatchCancellation::new())
        .await
        .expect("batch must survive a panicking worker");

    assert_eq!(results.len(), 2);
    let failed = results.iter().find(|r| r.agent == "bomb").unwrap();
    assert!(!failed.succeeded);
    assert!((failed.confidence - 0.0).abs() < f64::EPSILON);
    let ok = results.iter().find(|r| r.agent == "steady").unwrap();
    assert!(ok.succeeded);
}

#[tokio::test]
async fn per_task_timeout_yields_timed_out_result() {
    let executor = executor_with(
        &[(
            "slow",
            Arc::new(SlowWorker {
                delay: Duration::from_secs(5),
            }) as Arc<dyn Worker>,
        )],
        ExecutorConfig {
            task_timeout: Some(Duration::from_millis(50)),
            ..Default::default()
        },
    )
    .await;

    let results = executor
        .run_batch(&[task_for("slow", "crawl")], &BatchCancellation::new())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert!(results[0].timed_out);
    assert!(!results[0].succeeded);
}

#[tokio::test]
async fn batch_deadline_marks_unfinished_tasks() {
    let executor = executor_with(
        &[(
            "slow",
            Arc::new(SlowWorker {
                delay: Duration::from_secs(5),
            }) as Arc<dyn Worker>,
        )],
        ExecutorConfig {
            pool_size: 1,
            batch_deadline: Some(Duration::from_millis(100)),
            ..Default::default()
        },
    )
    .await;

    let tasks = vec![task_for("slow", "first"), task_for("slow", "second")];
    let results = executor
        .run_batch(&tasks, &BatchCancellation::new())
        .await
        .unwrap();

    // Neither slow task finished inside the deadline; both are marked.
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.timed_out));
    assert!(results.iter().all(|r| !r.succeeded));
}

#[tokio::test]
async fn deadline_reports_finished_tasks_as_completed_not_marked() {
    let executor = executor_with(
        &[
            ("quick", Arc::new(SteadyWorker) as Arc<dyn Worker>),
            (
                "slow",
                Arc::new(SlowWorker {
                    delay: Duration::from_secs(5),
                }) as Arc<dyn Worker>,
            ),
        ],
        ExecutorConfig {
            pool_size: 2,
            batch_deadline: Some(Duration::from_millis(100)),
            ..Default::default()
        },
    )
    .await;

    let tasks = vec![task_for("quick", "fast work"), task_for("slow", "slow work")];
    let results = executor
        .run_batch(&tasks, &BatchCancellation::new())
        .await
        .unwrap();

    // Exactly one entry per task: the finished one stays a completed
    // result, only the unfinished one gets a timed-out marker.
    assert_eq!(results.len(), 2);
    assert_eq!(results.iter().filter(|r| r.task == "fast work").count(), 1);
    let quick = results.iter().find(|r| r.agent == "quick").unwrap();
    assert!(quick.succeeded);
    assert!(!quick.timed_out);
    let slow = results.iter().find(|r| r.agent == "slow").unwrap();
    assert!(slow.timed_out);
    assert!(!slow.succeeded);
}

#[tokio::test]
async fn cancellation_stops_dequeueing_but_keeps_finished_work() {
    let executor = executor_with(
        &[(
            "slow",
            Arc::new(SlowWorker {
                delay: Duration::from_millis(100),
            }) as Arc<dyn Worker>,
        )],
        ExecutorConfig {
            pool_size: 1,
            ..Default::default()
        },
    )
    .await;

    let cancel = BatchCancellation::new();
    let tasks: Vec<Task> = (0..4).map(|i| task_for("slow", &format!("t{i}"))).collect();

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(120)).await;
        cancel_clone.cancel();
    });

    let results = executor.run_batch(&tasks, &cancel).await.unwrap();

    // With one pool slot and ~100ms per task, cancellation at ~120ms lets
    // one or two tasks through and skips the rest.
    assert!(!results.is_empty());
    assert!(results.len() < tasks.len());
    assert!(results.iter().all(|r| r.succeeded));
}

#[tokio::test]
async fn empty_batch_returns_empty_results() {
    let executor = executor_with(&[("steady", Arc::new(SteadyWorker))], ExecutorConfig::default()).await;
    let results = executor
        .run_batch(&[], &BatchCancellation::new())
        .await
        .unwrap();
    assert!(results.is_empty());
}
