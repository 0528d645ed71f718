use std::time::{Duration, Instant};

/// Tick period for a speed level: `1000 / speed_level` milliseconds.
#[must_use]
pub fn period_for_speed(speed_level: u32) -> Duration {
    Duration::from_millis(1000 / u64::from(speed_level.max(1)))
}

/// Restartable interval timer driven by the caller's clock.
///
/// The scheduler never sleeps itself: the event loop asks [`TickScheduler::poll`]
/// whether a tick is due and uses [`TickScheduler::time_until_next`] as its
/// input wait budget. A stopped scheduler has no deadline, so no later poll can
/// report a due tick until [`TickScheduler::start`] runs again.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TickScheduler {
    period: Duration,
    next_due: Option<Instant>,
}

impl TickScheduler {
    /// Creates a stopped scheduler.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// Arms the timer; the first tick fires one period after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    /// Drops the pending deadline.
    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Replaces the period; an armed timer restarts from `now`.
    pub fn set_period(&mut self, period: Duration, now: Instant) {
        self.period = period;
        if self.next_due.is_some() {
            self.next_due = Some(now + period);
        }
    }

    /// Returns true once per elapsed period and re-arms for the next one.
    ///
    /// Late polls do not queue catch-up ticks.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.period);
                true
            }
            _ => false,
        }
    }

    /// Time left before the next tick, or `None` when stopped.
    #[must_use]
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }
}
