//! Hivemind - swarm task orchestrator with shared persistent memory.
//!
//! Hivemind coordinates batches of heterogeneous agent workers over a
//! durable, append-only knowledge store. Every cycle passes an eligibility
//! gate, fans subtasks out across a bounded concurrent pool, cross-checks
//! the batch by confidence dispersion (with one automatic retry), and runs
//! an evolution pass that reinforces what worked and prunes what did not.
//!
//! # Architecture
//!
//! The crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure business logic and domain models
//! - **Service Layer** (`services`): Gate, planner, executor, verifier,
//!   evolution engine, and the composing orchestrator
//! - **Infrastructure Layer** (`infrastructure`): SQLite persistence,
//!   configuration loading, logging
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use hivemind::{Orchestrator, SwarmConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator = Orchestrator::with_sqlite(SwarmConfig::default()).await?;
//!     orchestrator
//!         .registry()
//!         .register("income_engine", "revenue", Arc::new(MyRevenueWorker))
//!         .await;
//!     let report = orchestrator.run_cycle("optimize delivery revenue", 97.0).await?;
//!     println!("{} tasks, dispersion {:.3}", report.results.len(), report.verification.dispersion);
//!     Ok(())
//! }
//! ```

pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{SwarmError, SwarmResult};
pub use domain::models::{
    AgentRegistration, DatabaseConfig, ExecutionResult, LoggingConfig, MemoryRecord,
    NewMemoryRecord, RecordId, SwarmConfig, Task, WorkerOutput,
};
pub use domain::ports::{MemoryStore, NullMemoryStore, NullWorker, Worker};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::database::{DatabaseConnection, SqliteMemoryStore};
pub use services::{
    AccessGate, AgentRegistry, BatchCancellation, BatchExecutor, CycleReport, EvolutionEngine,
    EvolutionReport, Orchestrator, SharedContext, TaskPlanner, VerificationReport, Verifier,
};
