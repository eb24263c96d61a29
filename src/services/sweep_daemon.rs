//! Background full-store evolution sweep.
//!
//! Runs [`EvolutionEngine::evolve_store`] on a fixed interval so records
//! that degraded only in light of later evidence still get pruned, even
//! when no batches are flowing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{error, info};

use crate::services::evolution::EvolutionEngine;

/// Sweep daemon configuration.
#[derive(Debug, Clone)]
pub struct SweepDaemonConfig {
    /// Interval between sweeps.
    pub sweep_interval: Duration,
    /// Whether to sweep immediately on startup.
    pub run_on_startup: bool,
    /// Consecutive failures before the daemon gives up.
    pub max_consecutive_failures: u32,
}

impl Default for SweepDaemonConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(3600),
            run_on_startup: false,
            max_consecutive_failures: 5,
        }
    }
}

impl SweepDaemonConfig {
    pub fn with_interval(sweep_interval: Duration) -> Self {
        Self {
            sweep_interval,
            ..Default::default()
        }
    }
}

/// Handle to a running sweep daemon.
pub struct DaemonHandle {
    shutdown: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl DaemonHandle {
    /// Request shutdown and wait for the daemon to exit.
    pub async fn stop(self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.handle.abort();
        let _ = self.handle.await;
    }
}

/// Spawn the periodic sweep loop.
pub fn spawn_sweep_daemon(engine: Arc<EvolutionEngine>, config: SweepDaemonConfig) -> DaemonHandle {
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = Arc::clone(&shutdown);

    let handle = tokio::spawn(async move {
        let mut ticker = interval(config.sweep_interval);
        let mut consecutive_failures = 0u32;

        if !config.run_on_startup {
            // The first tick of a tokio interval fires immediately.
            ticker.tick().await;
        }

        loop {
            ticker.tick().await;
            if shutdown_flag.load(Ordering::SeqCst) {
                break;
            }

            match engine.evolve_store().await {
                Ok(report) => {
                    consecutive_failures = 0;
                    info!(
                        pruned = report.pruned,
                        reinforced = report.reinforced.len(),
                        "scheduled sweep complete"
                    );
                }
                Err(err) => {
                    consecutive_failures += 1;
                    error!(%err, consecutive_failures, "scheduled sweep failed");
                    if consecutive_failures >= config.max_consecutive_failures {
                        error!("too many consecutive sweep failures, daemon stopping");
                        break;
                    }
                }
            }
        }
    });

    DaemonHandle { shutdown, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::NullMemoryStore;

    #[tokio::test]
    async fn daemon_stops_on_request() {
        let engine = Arc::new(EvolutionEngine::new(
            Arc::new(NullMemoryStore::new()),
            0.8,
            0.5,
            10,
        ));
        let handle = spawn_sweep_daemon(
            engine,
            SweepDaemonConfig::with_interval(Duration::from_millis(10)),
        );
        tokio::time::sleep(Duration::from_millis(30)).await;
        handle.stop().await;
    }
}
