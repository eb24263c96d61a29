//! End-to-end swarm cycle tests over a real SQLite store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use hivemind::domain::models::{Task, WorkerOutput};
use hivemind::domain::ports::{MemoryStore, Worker};
use hivemind::services::BASE_STEPS;
use hivemind::{Orchestrator, SwarmConfig, SwarmError};

fn test_config(dir: &tempfile::TempDir) -> SwarmConfig {
    let mut config = SwarmConfig::default();
    config.database.url = format!("sqlite:{}", dir.path().join("memory.db").display());
    config.database.max_connections = 2;
    config
}

/// Worker returning a fixed output for any task.
struct FixedWorker {
    confidence: f64,
}

#[async_trait]
impl Worker for FixedWorker {
    async fn execute(&self, _task: &Task) -> WorkerOutput {
        WorkerOutput::success("ok", self.confidence)
    }
}

/// Worker whose confidence is driven by a global invocation counter.
struct ScriptedWorker {
    calls: AtomicUsize,
    script: Vec<f64>,
    fallback: f64,
}

impl ScriptedWorker {
    fn new(script: Vec<f64>, fallback: f64) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            script,
            fallback,
        }
    }
}

#[async_trait]
impl Worker for ScriptedWorker {
    async fn execute(&self, _task: &Task) -> WorkerOutput {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let confidence = self.script.get(call).copied().unwrap_or(self.fallback);
        WorkerOutput::success("scripted", confidence)
    }
}

#[tokio::test]
async fn successful_cycle_records_every_task() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::with_sqlite(test_config(&dir)).await.unwrap();
    orchestrator
        .registry()
        .register("reporter", "reporting", Arc::new(FixedWorker { confidence: 0.9 }))
        .await;

    let report = orchestrator.run_cycle("assess reporter", 100.0).await.unwrap();

    assert_eq!(report.results.len(), BASE_STEPS.len());
    assert!(report.results.iter().all(|r| r.succeeded));
    assert!(report.results.iter().all(|r| r.record_id.is_some()));
    assert!(!report.verification.auto_retry);
    assert!(!report.retried);
    assert_eq!(
        orchestrator.store().count().await.unwrap(),
        BASE_STEPS.len() as u64
    );
}

#[tokio::test]
async fn ineligible_cycle_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::with_sqlite(test_config(&dir)).await.unwrap();
    orchestrator
        .registry()
        .register("reporter", "reporting", Arc::new(FixedWorker { confidence: 0.9 }))
        .await;

    let err = orchestrator.run_cycle("assess", 10.0).await.unwrap_err();
    assert!(matches!(err, SwarmError::Ineligible { .. }));
    assert_eq!(orchestrator.store().count().await.unwrap(), 0);
}

#[tokio::test]
async fn empty_registry_falls_back_to_null_generalist() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::with_sqlite(test_config(&dir)).await.unwrap();

    let report = orchestrator.run_cycle("assess the quarter", 100.0).await.unwrap();
    assert_eq!(report.results.len(), BASE_STEPS.len());
    assert!(report.results.iter().all(|r| r.agent == "generalist"));
    assert!(report.results.iter().all(|r| r.succeeded));
}

#[tokio::test]
async fn high_dispersion_batch_is_retried_once_then_passes() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::with_sqlite(test_config(&dir)).await.unwrap();
    // First batch diverges (1.0 vs 0.0); every later call settles at 0.9.
    orchestrator
        .registry()
        .register(
            "flaky",
            "general",
            Arc::new(ScriptedWorker::new(vec![1.0, 0.0], 0.9)),
        )
        .await;

    let report = orchestrator.run_cycle("assess stability", 100.0).await.unwrap();

    assert!(report.retried);
    assert!(!report.verification.auto_retry);
    assert!(report.verification.dispersion < 0.10);
    // Both the failed first batch and the retry were durably recorded.
    assert_eq!(
        orchestrator.store().count().await.unwrap(),
        (BASE_STEPS.len() * 2) as u64
    );
    // The flagged first pass left a lesson in the failure log.
    let lessons = orchestrator.verifier().lessons();
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0].reason, "high-dispersion");
}

#[tokio::test]
async fn two_high_dispersion_batches_surface_low_consensus() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::with_sqlite(test_config(&dir)).await.unwrap();
    // Keeps diverging forever: confidences alternate 1.0 / 0.0.
    orchestrator
        .registry()
        .register(
            "divergent",
            "general",
            Arc::new(ScriptedWorker::new(vec![1.0, 0.0, 1.0, 0.0], 1.0)),
        )
        .await;

    let err = orchestrator.run_cycle("assess stability", 100.0).await.unwrap_err();
    assert!(matches!(err, SwarmError::LowConsensus { .. }));
    // One lesson per flagged verification.
    assert_eq!(orchestrator.verifier().lessons().len(), 2);
}

#[tokio::test]
async fn reinforced_patterns_bias_the_next_plan() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::with_sqlite(test_config(&dir)).await.unwrap();
    orchestrator
        .registry()
        .register("steady", "general", Arc::new(FixedWorker { confidence: 0.95 }))
        .await;

    let first = orchestrator.run_cycle("improve delivery", 100.0).await.unwrap();
    assert!(!first.evolution.reinforced.is_empty());
    // "optimize delivery routes" is now a reinforced pattern and the next
    // goal mentioning delivery already contains it as a keyword step, so
    // the second plan matches the first.
    let second = orchestrator.run_cycle("improve delivery", 100.0).await.unwrap();
    assert_eq!(first.results.len(), second.results.len());
    assert!(orchestrator
        .evolution()
        .patterns()
        .contains(&"optimize delivery routes".to_string()));
}

#[tokio::test]
async fn export_shared_context_carries_schema_and_records() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::with_sqlite(test_config(&dir)).await.unwrap();
    orchestrator
        .registry()
        .register("reporter", "reporting", Arc::new(FixedWorker { confidence: 0.9 }))
        .await;
    orchestrator.run_cycle("assess reporter", 100.0).await.unwrap();

    let context = orchestrator.export_shared_context().await.unwrap();
    assert_eq!(context.schema, "mcp.swarm.v1");
    assert_eq!(context.agents, vec!["reporter"]);
    assert_eq!(context.records.len(), BASE_STEPS.len());
    assert!(context.token_estimate > 0);

    // The export shape must serialize for interop.
    let json = serde_json::to_value(&context).unwrap();
    assert_eq!(json["schema"], "mcp.swarm.v1");
}
