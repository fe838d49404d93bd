//! Duration unit tagging

use std::time::Duration;

/// Unit in which elapsed time is counted and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
}

impl TimeUnit {
    /// Nanoseconds per tick of this unit.
    pub const fn nanos_per_tick(self) -> i64 {
        match self {
            TimeUnit::Nanoseconds => 1,
            TimeUnit::Microseconds => 1_000,
            TimeUnit::Milliseconds => 1_000_000,
            TimeUnit::Seconds => 1_000_000_000,
            TimeUnit::Minutes => 60_000_000_000,
            TimeUnit::Hours => 3_600_000_000_000,
        }
    }

    /// Display label used in timer reports and summaries.
    pub const fn label(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "nanoseconds",
            TimeUnit::Microseconds => "microseconds",
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
        }
    }

    /// Converts a wall-clock duration to a whole number of ticks,
    /// truncating toward zero.
    pub fn ticks(self, duration: Duration) -> i64 {
        (duration.as_nanos() / self.nanos_per_tick() as u128) as i64
    }

    /// Converts a tick count back to a wall-clock duration. Negative
    /// counts clamp to zero.
    pub fn duration(self, ticks: i64) -> Duration {
        Duration::from_nanos(ticks.max(0) as u64 * self.nanos_per_tick() as u64)
    }
}

impl Default for TimeUnit {
    fn default() -> Self {
        TimeUnit::Microseconds
    }
}
