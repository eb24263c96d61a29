//! Infrastructure layer: persistence, configuration, and logging.

pub mod config;
pub mod database;
pub mod logging;
