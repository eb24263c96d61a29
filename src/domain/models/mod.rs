//! Domain models for the swarm core.

pub mod agent;
pub mod config;
pub mod memory;
pub mod task;

pub use agent::AgentRegistration;
pub use config::{DatabaseConfig, LoggingConfig, SwarmConfig};
pub use memory::{summarize, MemoryRecord, NewMemoryRecord, RecordId};
pub use task::{ExecutionResult, Task, WorkerOutput};
