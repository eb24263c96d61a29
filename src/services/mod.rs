//! Service layer: the swarm core's coordinating components.

pub mod access_gate;
pub mod agent_registry;
pub mod evolution;
pub mod executor;
pub mod orchestrator;
pub mod planner;
pub mod sweep_daemon;
pub mod verifier;

pub use access_gate::{AccessGate, OperationClass};
pub use agent_registry::{AgentRegistry, DEFAULT_AGENT};
pub use evolution::{EvolutionEngine, EvolutionReport};
pub use executor::{BatchCancellation, BatchExecutor, ExecutorConfig};
pub use orchestrator::{CycleReport, Orchestrator, SharedContext};
pub use planner::{TaskPlanner, BASE_STEPS};
pub use sweep_daemon::{spawn_sweep_daemon, DaemonHandle, SweepDaemonConfig};
pub use verifier::{FailureLesson, HistoryCheck, VerificationReport, Verifier};
