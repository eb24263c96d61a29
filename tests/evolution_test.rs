//! Evolution engine over a real SQLite knowledge store.

use std::sync::Arc;

use hivemind::domain::models::{ExecutionResult, NewMemoryRecord};
use hivemind::domain::ports::MemoryStore;
use hivemind::infrastructure::database::{DatabaseConnection, SqliteMemoryStore};
use hivemind::services::EvolutionEngine;

async fn setup_store() -> Arc<SqliteMemoryStore> {
    let db = DatabaseConnection::new("sqlite::memory:", 1)
        .await
        .expect("failed to create test database");
    db.migrate().await.expect("failed to run migrations");
    Arc::new(SqliteMemoryStore::new(db.pool().clone(), 95.0))
}

fn result(task: &str, confidence: f64, record_id: i64) -> ExecutionResult {
    ExecutionResult {
        agent: "agent".to_string(),
        task: task.to_string(),
        outcome: "outcome".to_string(),
        confidence,
        succeeded: confidence >= 0.5,
        elapsed_ms: 1,
        record_id: Some(record_id),
        timed_out: false,
    }
}

#[tokio::test]
async fn evolve_prunes_low_confidence_records_from_the_store() {
    let store = setup_store().await;
    let engine = EvolutionEngine::new(
        Arc::clone(&store) as Arc<dyn MemoryStore>,
        0.8,
        0.5,
        10,
    );

    let confidences = [0.95, 0.92, 0.91, 0.40, 0.30];
    let mut results = Vec::new();
    for (i, confidence) in confidences.iter().enumerate() {
        let id = store
            .append(
                NewMemoryRecord::new(format!("task {i}"), "outcome")
                    .with_confidence(*confidence),
            )
            .await
            .unwrap()
            .unwrap();
        results.push(result(&format!("task {i}"), *confidence, id));
    }
    assert_eq!(store.count().await.unwrap(), 5);

    let report = engine.evolve(&results).await.unwrap();

    // mean ≈ 0.696 keeps the floor at 0.8: three reinforce, two prune
    assert_eq!(report.reinforced.len(), 3);
    assert_eq!(report.pruned, 2);
    assert_eq!(store.count().await.unwrap(), 3);

    // The pruned records are really gone; the reinforced ones remain.
    let remaining = store.export().await.unwrap();
    assert!(remaining.iter().all(|r| r.confidence >= 0.8));
}

#[tokio::test]
async fn evolve_store_sweeps_degraded_records() {
    let store = setup_store().await;
    let engine = EvolutionEngine::new(
        Arc::clone(&store) as Arc<dyn MemoryStore>,
        0.8,
        0.5,
        10,
    );

    for i in 0..4 {
        store
            .append(NewMemoryRecord::new(format!("good {i}"), "fine").with_confidence(0.9))
            .await
            .unwrap()
            .unwrap();
    }
    for i in 0..3 {
        store
            .append(NewMemoryRecord::new(format!("bad {i}"), "poor").with_confidence(0.2))
            .await
            .unwrap()
            .unwrap();
    }

    let report = engine.evolve_store().await.unwrap();

    assert_eq!(report.pruned, 3);
    assert_eq!(store.count().await.unwrap(), 4);
    assert_eq!(report.reinforced.len(), 4);
    assert!(engine.patterns().iter().all(|p| p.starts_with("good")));
}
