//! Database infrastructure: connection management and the SQLite-backed
//! knowledge store.

pub mod connection;
pub mod memory_store;

pub use connection::DatabaseConnection;
pub use memory_store::SqliteMemoryStore;
