//! SQLite implementation of the knowledge store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::domain::errors::{SwarmError, SwarmResult};
use crate::domain::models::{summarize, MemoryRecord, NewMemoryRecord, RecordId};
use crate::domain::ports::MemoryStore;
use crate::domain::similarity;

/// SQLite-backed [`MemoryStore`].
///
/// Append is a single INSERT under WAL, so each record is atomic with
/// respect to concurrent appends and durable once the call returns. Recall
/// is a full scan scored in process; the store is sized for tens of
/// thousands of records, not a search index.
pub struct SqliteMemoryStore {
    pool: SqlitePool,
    eligibility_threshold: f64,
}

impl SqliteMemoryStore {
    /// Create a store over an existing pool.
    ///
    /// `eligibility_threshold` gates writes: records scored below it are
    /// rejected at append time and never stored.
    pub fn new(pool: SqlitePool, eligibility_threshold: f64) -> Self {
        Self {
            pool,
            eligibility_threshold,
        }
    }

    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> SwarmResult<MemoryRecord> {
        let metadata_json: String = row.get("metadata");
        let metadata: HashMap<String, serde_json::Value> = serde_json::from_str(&metadata_json)?;
        let created_at_raw: String = row.get("created_at");
        let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
            .map_err(|e| SwarmError::Storage(format!("invalid created_at: {e}")))?
            .with_timezone(&Utc);

        Ok(MemoryRecord {
            id: row.get("id"),
            action: row.get("action"),
            outcome: row.get("outcome"),
            eligibility_score: row.get("eligibility_score"),
            confidence: row.get("confidence"),
            feedback: row.get("feedback"),
            summary: row.get("summary"),
            metadata,
            created_at,
        })
    }

    async fn fetch_all(&self) -> SwarmResult<Vec<MemoryRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, action, outcome, eligibility_score, confidence,
                   feedback, summary, metadata, created_at
            FROM memory_records
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_record).collect()
    }
}

#[async_trait]
impl MemoryStore for SqliteMemoryStore {
    async fn append(&self, record: NewMemoryRecord) -> SwarmResult<Option<RecordId>> {
        if record.eligibility_score < self.eligibility_threshold {
            debug!(
                score = record.eligibility_score,
                threshold = self.eligibility_threshold,
                "append rejected by eligibility gate"
            );
            return Ok(None);
        }

        let summary = summarize(&record.outcome);
        let metadata_json = serde_json::to_string(&record.metadata)?;
        let created_at = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r"
            INSERT INTO memory_records (
                action, outcome, eligibility_score, confidence,
                feedback, summary, metadata, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&record.action)
        .bind(&record.outcome)
        .bind(record.eligibility_score)
        .bind(record.confidence)
        .bind(&record.feedback)
        .bind(&summary)
        .bind(&metadata_json)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        Ok(Some(result.last_insert_rowid()))
    }

    async fn recall_similar(&self, query: &str, top_k: usize) -> SwarmResult<Vec<MemoryRecord>> {
        let records = self.fetch_all().await?;
        if records.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let query_words = similarity::word_set(query);
        let mut scored: Vec<(f64, MemoryRecord)> = records
            .into_iter()
            .map(|rec| {
                let score = similarity::jaccard(&query_words, &similarity::word_set(&rec.action));
                (score, rec)
            })
            .collect();

        // Descending score; ties broken by most recent record.
        scored.sort_by(|(sa, ra), (sb, rb)| {
            sb.partial_cmp(sa)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| rb.created_at.cmp(&ra.created_at))
                .then_with(|| rb.id.cmp(&ra.id))
        });

        Ok(scored.into_iter().take(top_k).map(|(_, rec)| rec).collect())
    }

    async fn prune(&self, ids: &[RecordId]) -> SwarmResult<u64> {
        let mut removed = 0;
        for id in ids {
            let result = sqlx::query("DELETE FROM memory_records WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await?;
            removed += result.rows_affected();
        }
        if removed > 0 {
            debug!(removed, "pruned memory records");
        }
        Ok(removed)
    }

    async fn set_feedback(&self, id: RecordId, feedback: &str) -> SwarmResult<()> {
        let result = sqlx::query("UPDATE memory_records SET feedback = ? WHERE id = ?")
            .bind(feedback)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            warn!(id, "feedback for unknown record ignored");
        }
        Ok(())
    }

    async fn export(&self) -> SwarmResult<Vec<MemoryRecord>> {
        self.fetch_all().await
    }

    async fn count(&self) -> SwarmResult<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM memory_records")
            .fetch_one(&self.pool)
            .await?;
        let n: i64 = row.get("n");
        Ok(u64::try_from(n).unwrap_or(0))
    }
}
