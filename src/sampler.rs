//! Interval sampling: read, wait, read, delta.

use std::thread;
use std::time::{Duration, Instant};

use crate::collector::CollectError;
use crate::model::{CpuCounters, CpuUsage};
use crate::rates::CpuDeltaCalculator;

/// Shortest accepted sampling window, in seconds.
///
/// Below this, scheduler jitter and tick granularity dominate the result.
pub const MIN_INTERVAL_SECS: f64 = 0.1;

/// Anything that can produce a point-in-time CPU counter snapshot.
pub trait CounterSource {
    fn read_cpu_snapshot(&self) -> Result<CpuCounters, CollectError>;
}

/// Blocks the calling thread until `deadline`.
///
/// The remaining time is recomputed from the monotonic clock after every
/// wake-up, so an early return from the underlying sleep resumes waiting for
/// what is left rather than restarting or giving up.
pub fn sleep_until(deadline: Instant) {
    sleep_until_with(deadline, thread::sleep);
}

/// [`sleep_until`] with a caller-supplied sleep primitive.
pub fn sleep_until_with<S: FnMut(Duration)>(deadline: Instant, mut sleep: S) {
    loop {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        sleep(deadline - now);
    }
}

/// Returns the instant `interval` from now, or `IntervalTooLarge` when the
/// monotonic clock cannot represent it.
fn deadline_after(interval: Duration, interval_secs: f64) -> Result<Instant, CollectError> {
    Instant::now()
        .checked_add(interval)
        .ok_or(CollectError::IntervalTooLarge(interval_secs))
}

/// Validates a caller-supplied interval and converts it to a [`Duration`].
///
/// The interval must fit both a `Duration` and an `Instant` deadline.
pub fn interval_duration(interval_secs: f64) -> Result<Duration, CollectError> {
    if interval_secs.is_nan() || interval_secs < MIN_INTERVAL_SECS {
        return Err(CollectError::IntervalTooSmall(interval_secs));
    }
    let interval = Duration::try_from_secs_f64(interval_secs)
        .map_err(|_| CollectError::IntervalTooLarge(interval_secs))?;
    deadline_after(interval, interval_secs)?;
    Ok(interval)
}

/// Measures CPU usage over a wall-clock interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalSampler {
    calculator: CpuDeltaCalculator,
}

impl IntervalSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a snapshot, waits `interval_secs`, takes another and returns the
    /// usage between them.
    ///
    /// Errors from either read or from the calculation are returned as-is;
    /// nothing is retried.
    pub fn sample<S>(&self, source: &S, interval_secs: f64) -> Result<CpuUsage, CollectError>
    where
        S: CounterSource + ?Sized,
    {
        let interval = interval_duration(interval_secs)?;

        let start = source.read_cpu_snapshot()?;
        sleep_until(deadline_after(interval, interval_secs)?);
        let end = source.read_cpu_snapshot()?;

        self.calculator.calculate(&start, &end)
    }
}
