//! Fixed-interval driver for the update task.

use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

use crate::task::RateUpdateTask;

/// Runs the task once per period until the process is stopped. Runs are
/// serial: the next tick is not polled while a cycle is in flight, and
/// missed ticks are delayed rather than bursted.
pub async fn run_scheduler(task: RateUpdateTask, period: Duration) {
    info!("Rate update scheduler started ({}s interval)", period.as_secs());

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        task.run().await;
    }
}
