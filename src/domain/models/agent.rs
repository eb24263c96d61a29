//! Agent registration domain model.

use std::fmt;
use std::sync::Arc;

use crate::domain::ports::Worker;

/// A registered capability: a callable worker plus its declared specialty
/// tag. Owned by the registry; read-only after registration except for
/// explicit re-registration.
#[derive(Clone)]
pub struct AgentRegistration {
    /// Logical capability name.
    pub name: String,
    /// Short label used for best-effort task-to-agent matching.
    pub specialty: String,
    /// The callable implementation. Treated as an opaque, possibly slow or
    /// fallible external collaborator.
    pub worker: Arc<dyn Worker>,
}

impl fmt::Debug for AgentRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentRegistration")
            .field("name", &self.name)
            .field("specialty", &self.specialty)
            .finish_non_exhaustive()
    }
}
