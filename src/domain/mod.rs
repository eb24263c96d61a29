//! Domain layer: pure business logic and models.

pub mod errors;
pub mod models;
pub mod ports;
pub mod similarity;

pub use errors::{SwarmError, SwarmResult};
