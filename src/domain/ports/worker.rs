//! Worker port: the seam to external agent implementations.

use async_trait::async_trait;

use crate::domain::models::{Task, WorkerOutput};

/// A callable capability implementation.
///
/// Workers are opaque external collaborators: possibly slow, possibly
/// fallible. The executor imposes its own panic and timeout boundary, so
/// implementations return an output rather than an error; a worker that
/// cannot do its job reports `succeeded == false` through
/// [`WorkerOutput::failure`].
#[async_trait]
pub trait Worker: Send + Sync {
    async fn execute(&self, task: &Task) -> WorkerOutput;
}

/// Null-object worker registered when no real implementation is supplied.
///
/// Keeps the registry contract uniform regardless of which collaborators
/// are actually wired in: it acknowledges the task with a fixed middling
/// confidence instead of failing.
#[derive(Debug, Clone, Default)]
pub struct NullWorker;

impl NullWorker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Worker for NullWorker {
    async fn execute(&self, task: &Task) -> WorkerOutput {
        WorkerOutput::success(format!("acknowledged '{}' (no-op)", task.description), 0.82)
    }
}
