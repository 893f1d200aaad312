use std::time::Duration;

/// Fixed re-poll cadence for one resource.
///
/// No backoff: a failed tick is retried by the next tick, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    interval: Duration,
}

impl PollSchedule {
    /// Cadence used by the admin and provider dashboards.
    pub const DASHBOARD: PollSchedule = PollSchedule {
        interval: Duration::from_millis(30_000),
    };

    /// `None` for a zero interval: the resource is fetched once and on demand.
    pub fn every(interval: Duration) -> Option<Self> {
        if interval.is_zero() {
            None
        } else {
            Some(Self { interval })
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
