//! Knowledge store port.

use async_trait::async_trait;

use crate::domain::errors::SwarmResult;
use crate::domain::models::{MemoryRecord, NewMemoryRecord, RecordId};

/// Durable, append-only knowledge store with similarity recall.
///
/// The store owns all records exclusively: every access goes through this
/// trait, all mutation is internally synchronized, and a record's
/// `confidence` and `outcome` are immutable after creation. Creation,
/// feedback annotation, and deletion are the only writes.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Append a record, assigning its id, timestamp, and summary.
    ///
    /// Returns `Ok(None)` without writing when the record's eligibility
    /// score is below the store's threshold; rejection is data, not an
    /// error. Atomic per record: the returned id refers to a fully durable
    /// row.
    async fn append(&self, record: NewMemoryRecord) -> SwarmResult<Option<RecordId>>;

    /// Recall the `top_k` records whose `action` text is most similar to
    /// `query` (Jaccard over case-normalized word sets), ties broken by
    /// most recent `created_at`. An empty store yields an empty vec.
    async fn recall_similar(&self, query: &str, top_k: usize) -> SwarmResult<Vec<MemoryRecord>>;

    /// Delete the named records. Idempotent: already-gone ids are skipped.
    /// Returns the number of rows actually removed.
    async fn prune(&self, ids: &[RecordId]) -> SwarmResult<u64>;

    /// Annotate a record with later-caller feedback. The only permitted
    /// post-creation write.
    async fn set_feedback(&self, id: RecordId, feedback: &str) -> SwarmResult<()>;

    /// Full snapshot for interop/backup. Not a hot-path read.
    async fn export(&self) -> SwarmResult<Vec<MemoryRecord>>;

    /// Number of live records.
    async fn count(&self) -> SwarmResult<u64>;
}
