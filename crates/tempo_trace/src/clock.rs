//! Trace clock
//!
//! Microsecond timestamps anchored to the UNIX epoch at first use,
//! advanced by a monotonic clock so values never run backwards within
//! one process.

use once_cell::sync::Lazy;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

struct TraceClock {
    base: Instant,
    epoch_us: i64,
}

static CLOCK: Lazy<TraceClock> = Lazy::new(|| TraceClock {
    base: Instant::now(),
    epoch_us: SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|offset| offset.as_micros() as i64)
        .unwrap_or(0),
});

/// Current trace timestamp in microseconds.
pub fn timestamp_us() -> i64 {
    CLOCK.epoch_us + CLOCK.base.elapsed().as_micros() as i64
}
