//! Recurring cleanup of the temp workspace.
//!
//! The scheduler waits until the gateway is ready, then ticks on a fixed
//! interval. The first tick fires immediately and is skipped, so the first
//! sweep happens one interval after readiness.

use async_trait::async_trait;
use parking_lot::Mutex;
use scaffold_common::{ClearReport, TempWorkspace};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Time between two sweeps.
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Something the scheduler can sweep.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Sweep: Send + Sync {
    /// Removes the swept contents.
    async fn sweep(&self) -> ClearReport;
}

#[async_trait]
impl Sweep for TempWorkspace {
    async fn sweep(&self) -> ClearReport {
        self.clear().await
    }
}

/// Lifecycle of a [`CleanupScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Constructed, not yet running.
    Created,
    /// Waiting for the readiness signal.
    WaitingForReady,
    /// Waiting for the next tick.
    Idle,
    /// A sweep is in progress.
    Running,
    /// Finished; will not sweep again.
    Stopped,
}

/// Read-only view of a scheduler's state.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    state: Arc<Mutex<SchedulerState>>,
}

impl SchedulerHandle {
    /// Current state.
    pub fn state(&self) -> SchedulerState {
        *self.state.lock()
    }
}

/// Hourly sweeper of the temp workspace.
pub struct CleanupScheduler<S: ?Sized> {
    sweeper: Arc<S>,
    interval: Duration,
    ready: watch::Receiver<bool>,
    cancel: CancellationToken,
    state: Arc<Mutex<SchedulerState>>,
}

impl<S: Sweep + ?Sized + 'static> CleanupScheduler<S> {
    /// New scheduler; call [`run`](Self::run) to start it.
    pub fn new(
        sweeper: Arc<S>,
        interval: Duration,
        ready: watch::Receiver<bool>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            sweeper,
            interval,
            ready,
            cancel,
            state: Arc::new(Mutex::new(SchedulerState::Created)),
        }
    }

    /// Handle for observing the state after `run` takes ownership.
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            state: self.state.clone(),
        }
    }

    fn set_state(&self, state: SchedulerState) {
        *self.state.lock() = state;
    }

    /// Runs until cancelled. Returns the number of sweeps performed.
    pub async fn run(mut self) -> u64 {
        self.set_state(SchedulerState::WaitingForReady);

        let ready = tokio::select! {
            () = self.cancel.cancelled() => false,
            ready = wait_ready(&mut self.ready) => {
                if !ready {
                    warn!("Readiness signal dropped; cleanup scheduler not started");
                }
                ready
            }
        };
        if !ready {
            self.set_state(SchedulerState::Stopped);
            return 0;
        }

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.set_state(SchedulerState::Idle);

        let mut current_loop: u64 = 0;
        let mut sweeps: u64 = 0;
        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            debug!("Cleaning temp directory... [loop #{current_loop}]");
            if current_loop > 0 {
                self.set_state(SchedulerState::Running);
                let report = self.sweeper.sweep().await;
                self.set_state(SchedulerState::Idle);
                sweeps += 1;
                info!(
                    "Finished clearing temp directory. [loop #{current_loop}, removed {}, failed {}]",
                    report.removed,
                    report.failed.len()
                );
            }
            current_loop += 1;
        }

        self.set_state(SchedulerState::Stopped);
        info!("Cleanup scheduler stopped after {sweeps} sweeps");
        sweeps
    }
}

/// Resolves once the flag is `true`; `false` if the sender went away first.
async fn wait_ready(ready: &mut watch::Receiver<bool>) -> bool {
    ready.wait_for(|ready| *ready).await.is_ok()
}
