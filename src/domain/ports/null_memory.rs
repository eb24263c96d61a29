//! Null knowledge store implementation.
//!
//! Used when persistence is not wired in but the type system requires a
//! `MemoryStore` implementation.

use async_trait::async_trait;

use super::MemoryStore;
use crate::domain::errors::SwarmResult;
use crate::domain::models::{MemoryRecord, NewMemoryRecord, RecordId};

/// A no-op store that accepts and remembers nothing.
#[derive(Debug, Clone, Default)]
pub struct NullMemoryStore;

impl NullMemoryStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MemoryStore for NullMemoryStore {
    async fn append(&self, _record: NewMemoryRecord) -> SwarmResult<Option<RecordId>> {
        Ok(None)
    }

    async fn recall_similar(&self, _query: &str, _top_k: usize) -> SwarmResult<Vec<MemoryRecord>> {
        Ok(Vec::new())
    }

    async fn prune(&self, _ids: &[RecordId]) -> SwarmResult<u64> {
        Ok(0)
    }

    async fn set_feedback(&self, _id: RecordId, _feedback: &str) -> SwarmResult<()> {
        Ok(())
    }

    async fn export(&self) -> SwarmResult<Vec<MemoryRecord>> {
        Ok(Vec::new())
    }

    async fn count(&self) -> SwarmResult<u64> {
        Ok(0)
    }
}
