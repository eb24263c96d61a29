//! Ports: trait seams between the domain and the outside world.

pub mod memory_store;
pub mod null_memory;
pub mod worker;

pub use memory_store::MemoryStore;
pub use null_memory::NullMemoryStore;
pub use worker::{NullWorker, Worker};
