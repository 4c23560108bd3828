use chrono::{DateTime, Timelike, Utc};

/// Wall-clock capability. The orchestrator never reads system time directly;
/// expiry windows are computed against an injected clock so tests can pin
/// boundary instants exactly.
pub trait Clock: Send + Sync {
    /// Current time, truncated to whole seconds.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        truncate_subsec(Utc::now())
    }
}

/// Clock pinned to a fixed instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        truncate_subsec(self.0)
    }
}

/// Drop the sub-second component of a timestamp.
pub fn truncate_subsec(t: DateTime<Utc>) -> DateTime<Utc> {
    t.with_nanosecond(0).unwrap_or(t)
}
