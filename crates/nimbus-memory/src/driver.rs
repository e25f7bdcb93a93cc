//! Periodic driver for scheduler cycles

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Running scheduler loop. Dropping the handle leaves the loop running;
/// call [`SchedulerHandle::stop`] or cancel the token to end it.
pub struct SchedulerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the loop and wait for it to exit
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Memory scheduler task ended abnormally");
        }
    }
}

/// Call `tick` every `period`, first after one full period.
/// Must be called from within a tokio runtime.
pub fn spawn_scheduler<F>(period: Duration, mut tick: F) -> SchedulerHandle
where
    F: FnMut() + Send + 'static,
{
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(period_secs = period.as_secs(), "Memory scheduler started");

        loop {
            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    tracing::info!("Memory scheduler stopped");
                    break;
                }

                _ = ticker.tick() => tick(),
            }
        }
    });

    SchedulerHandle { cancel, task }
}
