//! Periodic scheduling for polling loops.
//!
//! The host owns the ticker and decides what runs on each tick; nothing in
//! the submission path depends on it.

use std::time::Duration;

use tokio::time::{interval, Interval, MissedTickBehavior};

/// Fires every `period`, starting immediately.
pub struct Ticker {
    interval: Interval,
    ticks: u64,
}

impl Ticker {
    /// A zero period is bumped to one second.
    pub fn new(period: Duration) -> Self {
        let period = if period.is_zero() {
            Duration::from_secs(1)
        } else {
            period
        };
        let mut interval = interval(period);
        // Late ticks shift the schedule instead of bursting.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval, ticks: 0 }
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }

    /// Wait for the next tick and return how many ticks have fired so far.
    pub async fn tick(&mut self) -> u64 {
        self.interval.tick().await;
        self.ticks += 1;
        self.ticks
    }
}
