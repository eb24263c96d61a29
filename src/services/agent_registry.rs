//! Agent registry: capability name → worker + specialty tag.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::models::AgentRegistration;
use crate::domain::ports::{NullWorker, Worker};

/// Name given to the null-object agent registered when nothing else is.
pub const DEFAULT_AGENT: &str = "generalist";

#[derive(Default)]
struct RegistryInner {
    /// Insertion order, so the planner's fallback pick is deterministic.
    order: Vec<String>,
    agents: HashMap<String, AgentRegistration>,
}

/// Maps logical capability names to callable workers.
///
/// Read-mostly after startup, but internally synchronized so live
/// re-registration is safe while batches run. No persistence; rebuilt at
/// process start.
#[derive(Default)]
pub struct AgentRegistry {
    inner: RwLock<RegistryInner>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or re-register) a capability.
    pub async fn register(
        &self,
        name: impl Into<String>,
        specialty: impl Into<String>,
        worker: Arc<dyn Worker>,
    ) {
        let name = name.into();
        let specialty = specialty.into();
        let mut inner = self.inner.write().await;
        if !inner.agents.contains_key(&name) {
            inner.order.push(name.clone());
        }
        info!(agent = %name, specialty = %specialty, "agent registered");
        inner.agents.insert(
            name.clone(),
            AgentRegistration {
                name,
                specialty,
                worker,
            },
        );
    }

    /// Resolve a capability name to its registration.
    pub async fn resolve(&self, name: &str) -> Option<AgentRegistration> {
        self.inner.read().await.agents.get(name).cloned()
    }

    /// Names of agents declaring the given specialty tag.
    pub async fn by_specialty(&self, tag: &str) -> Vec<String> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter(|name| {
                inner
                    .agents
                    .get(*name)
                    .is_some_and(|reg| reg.specialty.eq_ignore_ascii_case(tag))
            })
            .cloned()
            .collect()
    }

    /// Registered names in insertion order.
    pub async fn names(&self) -> Vec<String> {
        self.inner.read().await.order.clone()
    }

    /// Registrations in insertion order.
    pub async fn registrations(&self) -> Vec<AgentRegistration> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|name| inner.agents.get(name).cloned())
            .collect()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.order.is_empty()
    }

    /// Register the null-object [`DEFAULT_AGENT`] when nothing real is
    /// wired in, so planning always resolves a live agent.
    pub async fn ensure_default(&self) {
        if self.is_empty().await {
            self.register(DEFAULT_AGENT, "general", Arc::new(NullWorker::new()))
                .await;
        }
    }
}
