//! The swarm orchestrator: the single public entry point composing
//! gate → planner → executor → verifier → evolution engine.
//!
//! One orchestrator instance owns one knowledge store and one agent
//! registry, constructed at process start and shared by reference with all
//! components; there is no ambient global state.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::errors::{SwarmError, SwarmResult};
use crate::domain::models::{ExecutionResult, MemoryRecord, SwarmConfig};
use crate::domain::ports::MemoryStore;
use crate::infrastructure::database::{DatabaseConnection, SqliteMemoryStore};
use crate::services::access_gate::AccessGate;
use crate::services::agent_registry::AgentRegistry;
use crate::services::evolution::{EvolutionEngine, EvolutionReport};
use crate::services::executor::{BatchCancellation, BatchExecutor, ExecutorConfig};
use crate::services::planner::TaskPlanner;
use crate::services::sweep_daemon::{spawn_sweep_daemon, DaemonHandle, SweepDaemonConfig};
use crate::services::verifier::{VerificationReport, Verifier};

/// Everything a caller learns from one completed cycle. Failed sub-results
/// are included and clearly marked; a partially-filled report is never
/// disguised as success.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CycleReport {
    pub cycle_id: Uuid,
    pub goal: String,
    pub results: Vec<ExecutionResult>,
    pub verification: VerificationReport,
    pub evolution: EvolutionReport,
    /// Whether the batch was re-submitted once after a high-dispersion
    /// verification.
    pub retried: bool,
}

/// MCP-style shared-context export for agent interop.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SharedContext {
    pub schema: String,
    pub exported_at: DateTime<Utc>,
    pub agents: Vec<String>,
    pub records: Vec<MemoryRecord>,
    /// Rough size estimate at ~4 chars per token.
    pub token_estimate: usize,
}

/// The swarm orchestrator.
pub struct Orchestrator {
    store: Arc<dyn MemoryStore>,
    registry: Arc<AgentRegistry>,
    gate: AccessGate,
    planner: TaskPlanner,
    executor: BatchExecutor,
    verifier: Arc<Verifier>,
    evolution: Arc<EvolutionEngine>,
    config: SwarmConfig,
}

impl Orchestrator {
    /// Build an orchestrator over an existing knowledge store.
    pub fn new(store: Arc<dyn MemoryStore>, config: SwarmConfig) -> Self {
        let registry = Arc::new(AgentRegistry::new());
        let gate = AccessGate::new(&config);
        let planner = TaskPlanner::new(Arc::clone(&registry), gate.clone());
        let executor = BatchExecutor::new(
            Arc::clone(&registry),
            Arc::clone(&store),
            ExecutorConfig::from(&config),
        );
        let verifier = Arc::new(Verifier::new(
            Arc::clone(&store),
            config.dispersion_threshold,
        ));
        let evolution = Arc::new(EvolutionEngine::new(
            Arc::clone(&store),
            config.reinforce_floor,
            config.prune_ceiling,
            config.pattern_cap,
        ));

        Self {
            store,
            registry,
            gate,
            planner,
            executor,
            verifier,
            evolution,
            config,
        }
    }

    /// Build an orchestrator over a freshly opened (and migrated) SQLite
    /// knowledge store described by the config.
    pub async fn with_sqlite(config: SwarmConfig) -> SwarmResult<Self> {
        let connection =
            DatabaseConnection::new(&config.database.url, config.database.max_connections)
                .await
                .map_err(|e| SwarmError::Storage(e.to_string()))?;
        connection
            .migrate()
            .await
            .map_err(|e| SwarmError::Storage(e.to_string()))?;
        let store = Arc::new(SqliteMemoryStore::new(
            connection.pool().clone(),
            config.eligibility_threshold,
        ));
        Ok(Self::new(store, config))
    }

    /// The shared agent registry; register capabilities here before the
    /// first cycle runs.
    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    /// The shared knowledge store.
    pub fn store(&self) -> &Arc<dyn MemoryStore> {
        &self.store
    }

    /// The batch verifier (exposes the in-memory failure log).
    pub fn verifier(&self) -> &Arc<Verifier> {
        &self.verifier
    }

    /// The evolution engine (exposes reinforced patterns and manual sweeps).
    pub fn evolution(&self) -> &Arc<EvolutionEngine> {
        &self.evolution
    }

    /// Run one full swarm cycle for a goal.
    pub async fn run_cycle(&self, goal: &str, eligibility_score: f64) -> SwarmResult<CycleReport> {
        self.run_cycle_with_cancel(goal, eligibility_score, &BatchCancellation::new())
            .await
    }

    /// Run one cycle under a cooperative cancellation signal.
    ///
    /// Gate → plan → execute → verify (with at most one automatic retry of
    /// the same task set) → evolve. A second high-dispersion verification
    /// surfaces as [`SwarmError::LowConsensus`] rather than retrying again.
    pub async fn run_cycle_with_cancel(
        &self,
        goal: &str,
        eligibility_score: f64,
        cancel: &BatchCancellation,
    ) -> SwarmResult<CycleReport> {
        self.gate.authorize_operation("run_cycle", eligibility_score)?;
        self.registry.ensure_default().await;

        let cycle_id = Uuid::new_v4();
        info!(%cycle_id, goal, eligibility_score, "cycle started");

        let patterns = self.evolution.patterns();
        let tasks = self.planner.plan(goal, eligibility_score, &patterns).await?;
        info!(%cycle_id, task_count = tasks.len(), "goal planned");

        let mut results = self.executor.run_batch(&tasks, cancel).await?;
        let mut verification = self.verifier.verify(&results);
        let mut retried = false;

        if verification.auto_retry {
            warn!(
                %cycle_id,
                dispersion = verification.dispersion,
                "high dispersion, retrying batch once"
            );
            retried = true;
            results = self.executor.run_batch(&tasks, cancel).await?;
            verification = self.verifier.verify(&results);
            if verification.auto_retry {
                return Err(SwarmError::LowConsensus {
                    dispersion: verification.dispersion,
                });
            }
        }

        let evolution = self.evolution.evolve(&results).await?;
        info!(
            %cycle_id,
            results = results.len(),
            dispersion = verification.dispersion,
            pruned = evolution.pruned,
            "cycle complete"
        );

        Ok(CycleReport {
            cycle_id,
            goal: goal.to_string(),
            results,
            verification,
            evolution,
            retried,
        })
    }

    /// Export the shared memory context in the MCP-style interop shape.
    pub async fn export_shared_context(&self) -> SwarmResult<SharedContext> {
        let records = self.store.export().await?;
        let token_estimate = records.iter().map(MemoryRecord::token_estimate).sum();
        Ok(SharedContext {
            schema: "mcp.swarm.v1".to_string(),
            exported_at: Utc::now(),
            agents: self.registry.names().await,
            records,
            token_estimate,
        })
    }

    /// Start the periodic full-store evolution sweep, if configured.
    /// Returns `None` when `sweep_interval_secs` is unset.
    pub fn start_sweep_daemon(&self) -> Option<DaemonHandle> {
        let interval_secs = self.config.sweep_interval_secs?;
        let config = SweepDaemonConfig::with_interval(std::time::Duration::from_secs(interval_secs));
        Some(spawn_sweep_daemon(Arc::clone(&self.evolution), config))
    }
}
