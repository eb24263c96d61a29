//! Evolution engine: online reinforcement and pruning.
//!
//! After every batch (and optionally on a periodic full-store sweep) the
//! engine reclassifies experience: high-confidence records reinforce — their
//! task text joins a small list of named patterns that bias future planning —
//! while chronically low-confidence records are pruned from the knowledge
//! store.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use tracing::info;

use crate::domain::errors::SwarmResult;
use crate::domain::models::{ExecutionResult, RecordId};
use crate::domain::ports::MemoryStore;

/// Low performers deleted per full-store sweep, so a single sweep cannot
/// mass-delete history; chronic cases go over successive sweeps.
const SWEEP_PRUNE_LIMIT: usize = 10;

/// Outcome of one evolution pass.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct EvolutionReport {
    /// Mean confidence over the classified set.
    pub mean_confidence: f64,
    /// Task descriptions promoted to reinforced patterns this pass.
    pub reinforced: Vec<String>,
    /// Knowledge-store records deleted this pass.
    pub pruned: u64,
}

/// Classifies experience into reinforce/prune sets and maintains the
/// pattern list fed back into planning.
pub struct EvolutionEngine {
    store: Arc<dyn MemoryStore>,
    reinforce_floor: f64,
    prune_ceiling: f64,
    pattern_cap: usize,
    patterns: Mutex<VecDeque<String>>,
}

impl EvolutionEngine {
    pub fn new(
        store: Arc<dyn MemoryStore>,
        reinforce_floor: f64,
        prune_ceiling: f64,
        pattern_cap: usize,
    ) -> Self {
        Self {
            store,
            reinforce_floor,
            prune_ceiling,
            pattern_cap,
            patterns: Mutex::new(VecDeque::new()),
        }
    }

    /// Evolve from one batch of results. O(batch size) plus the prune.
    ///
    /// Results at or above `max(reinforce_floor, batch mean)` confidence
    /// reinforce; results strictly below the prune ceiling have their
    /// underlying store records deleted.
    pub async fn evolve(&self, results: &[ExecutionResult]) -> SwarmResult<EvolutionReport> {
        if results.is_empty() {
            return Ok(EvolutionReport::default());
        }

        let mean = results.iter().map(|r| r.confidence).sum::<f64>() / results.len() as f64;
        let floor = self.reinforce_floor.max(mean);

        let reinforced: Vec<String> = results
            .iter()
            .filter(|r| r.confidence >= floor)
            .map(|r| r.task.clone())
            .collect();
        self.absorb_patterns(&reinforced);

        let prune_ids: Vec<RecordId> = results
            .iter()
            .filter(|r| r.confidence < self.prune_ceiling)
            .filter_map(|r| r.record_id)
            .collect();
        let pruned = self.store.prune(&prune_ids).await?;

        info!(
            mean_confidence = mean,
            reinforced = reinforced.len(),
            pruned,
            "batch evolution pass complete"
        );
        Ok(EvolutionReport {
            mean_confidence: mean,
            reinforced,
            pruned,
        })
    }

    /// Evolve from the whole knowledge store. O(store size); meant for a
    /// scheduled sweep, catching records that degraded only in light of
    /// later evidence.
    pub async fn evolve_store(&self) -> SwarmResult<EvolutionReport> {
        let records = self.store.export().await?;
        if records.is_empty() {
            return Ok(EvolutionReport::default());
        }

        let mean = records.iter().map(|r| r.confidence).sum::<f64>() / records.len() as f64;
        let floor = self.reinforce_floor.max(mean);

        let reinforced: Vec<String> = records
            .iter()
            .filter(|r| r.confidence >= floor)
            .map(|r| r.action.clone())
            .collect();
        self.absorb_patterns(&reinforced);

        let prune_ids: Vec<RecordId> = records
            .iter()
            .filter(|r| r.confidence < self.prune_ceiling)
            .map(|r| r.id)
            .take(SWEEP_PRUNE_LIMIT)
            .collect();
        let pruned = self.store.prune(&prune_ids).await?;

        info!(
            mean_confidence = mean,
            reinforced = reinforced.len(),
            pruned,
            "full-store evolution sweep complete"
        );
        Ok(EvolutionReport {
            mean_confidence: mean,
            reinforced,
            pruned,
        })
    }

    /// Current reinforced patterns, most recent last.
    pub fn patterns(&self) -> Vec<String> {
        self.patterns
            .lock()
            .map(|p| p.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn absorb_patterns(&self, reinforced: &[String]) {
        let Ok(mut patterns) = self.patterns.lock() else {
            return;
        };
        for pattern in reinforced {
            // Re-reinforcement moves a pattern back to the recent end.
            if let Some(pos) = patterns.iter().position(|p| p == pattern) {
                patterns.remove(pos);
            }
            patterns.push_back(pattern.clone());
            while patterns.len() > self.pattern_cap {
                patterns.pop_front();
            }
        }
    }
}
