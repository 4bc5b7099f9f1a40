//! Periodic execution of the change detector.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use panelwatch_core::{PanelistChangeDetector, RunReport};

use crate::error::Error;

/// Counters collected while polling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    /// Runs started.
    pub runs: u64,
    /// Runs that ended with an error.
    pub failures: u64,
    /// Events emitted by successful runs.
    pub events: u64,
}

impl PollStats {
    /// Runs that completed successfully.
    pub fn successes(&self) -> u64 {
        self.runs - self.failures
    }
}

/// Shortest accepted polling interval.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Runs the detector on a fixed interval until shutdown.
pub struct Poller {
    detector: PanelistChangeDetector,
    interval: Duration,
    run_on_start: bool,
}

impl Poller {
    /// Create a poller that runs at startup and then every `interval`.
    ///
    /// Intervals shorter than [`MIN_INTERVAL`] are raised to it.
    pub fn new(detector: PanelistChangeDetector, interval: Duration) -> Self {
        Self {
            detector,
            interval: interval.max(MIN_INTERVAL),
            run_on_start: true,
        }
    }

    /// Set whether to run immediately at startup.
    pub fn with_run_on_start(mut self, run_on_start: bool) -> Self {
        self.run_on_start = run_on_start;
        self
    }

    /// Get the detector.
    pub fn detector(&self) -> &PanelistChangeDetector {
        &self.detector
    }

    /// Get the polling interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the detector once.
    pub async fn run_once(&self) -> Result<RunReport, Error> {
        Ok(self.detector.run().await?)
    }

    /// Poll until a shutdown signal is received.
    ///
    /// A failed run is logged and the next tick runs again; runs never
    /// overlap and a slow run delays the following tick.
    pub async fn run_until_shutdown(&self, mut shutdown: broadcast::Receiver<()>) -> PollStats {
        let mut stats = PollStats::default();
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick completes immediately
        if !self.run_on_start {
            ticker.tick().await;
        }

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            run_on_start = self.run_on_start,
            "poller started"
        );

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!(
                        runs = stats.runs,
                        failures = stats.failures,
                        events = stats.events,
                        "shutdown signal received, stopping poller"
                    );
                    break;
                }
                _ = ticker.tick() => {
                    stats.runs += 1;
                    match self.run_once().await {
                        Ok(report) => {
                            stats.events += report.total_events() as u64;
                        }
                        Err(e) => {
                            stats.failures += 1;
                            tracing::error!(error = %e, run = stats.runs, "panelist check failed");
                        }
                    }
                }
            }
        }

        stats
    }
}
