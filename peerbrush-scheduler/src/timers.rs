//! The recurring timer pair owned by an armed session.

use peerbrush_core::BotId;
use peerbrush_driver::InteractionDriver;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// One refresh timer and one cycle timer.
///
/// Dropping the set stops both. Replacing a session's set therefore never
/// leaves a stale timer behind. Work already started by a tick runs on its
/// own task and is not interrupted.
pub(crate) struct TimerSet {
    refresh: JoinHandle<()>,
    cycle: JoinHandle<()>,
}

impl TimerSet {
    /// Start both timers. The first tick of each comes one full period
    /// from now.
    pub(crate) fn start(
        driver: Arc<InteractionDriver>,
        bot: BotId,
        refresh_every: Duration,
        cycle_every: Duration,
    ) -> Self {
        let refresh = {
            let driver = Arc::clone(&driver);
            let period = refresh_every.max(MIN_PERIOD);
            tokio::spawn(async move {
                let mut ticks = interval_at(Instant::now() + period, period);
                ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticks.tick().await;
                    tracing::debug!(bot = %bot, "peerbrush.timer.refresh");
                    let driver = Arc::clone(&driver);
                    tokio::spawn(async move { driver.refresh_status(&bot).await });
                }
            })
        };

        let cycle = {
            let period = cycle_every.max(MIN_PERIOD);
            tokio::spawn(async move {
                let mut ticks = interval_at(Instant::now() + period, period);
                ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticks.tick().await;
                    let driver = Arc::clone(&driver);
                    tokio::spawn(async move {
                        if driver.ledger().has_run_today(&bot).await {
                            tracing::debug!(bot = %bot, "peerbrush.timer.cycle_skipped");
                            return;
                        }
                        tracing::debug!(bot = %bot, "peerbrush.timer.cycle");
                        driver.run_cycle(&bot).await;
                    });
                }
            })
        };

        Self { refresh, cycle }
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.refresh.abort();
        self.cycle.abort();
    }
}
