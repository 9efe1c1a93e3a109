//! CPU rate computation from two cumulative counter snapshots.
//!
//! CPU usage only exists over an interval: a single `/proc/stat` snapshot
//! holds ticks since boot, and the percentages come from the difference
//! between two of them.

use crate::collector::CollectError;
use crate::model::{CpuCounters, CpuUsage};

/// Signed difference of two counters, as a float.
///
/// A counter that went backwards gives a negative value instead of wrapping.
fn delta(end: u64, start: u64) -> f64 {
    (i128::from(end) - i128::from(start)) as f64
}

/// Derives a [`CpuUsage`] from two snapshots taken in temporal order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuDeltaCalculator;

impl CpuDeltaCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Computes the per-state percentages between `start` and `end`.
    ///
    /// Fails with [`CollectError::InvalidInterval`] when the counter total did
    /// not advance (`Σend <= Σstart`), which covers identical snapshots,
    /// swapped arguments and counter overflow.
    ///
    /// Every percentage shares the same denominator, so the eight states sum
    /// to 100 and `total + idle + iowait == 100`. Individual percentages are
    /// not clamped: a corrupted counter shows up as an out-of-range value.
    pub fn calculate(&self, start: &CpuCounters, end: &CpuCounters) -> Result<CpuUsage, CollectError> {
        let total_start = start.total();
        let total_end = end.total();
        if total_end <= total_start {
            return Err(CollectError::InvalidInterval {
                start: total_start,
                end: total_end,
            });
        }

        let diff = (total_end - total_start) as f64;
        let pct = |e: u64, s: u64| delta(e, s) / diff * 100.0;

        let idle = pct(end.idle, start.idle);
        let iowait = pct(end.iowait, start.iowait);

        Ok(CpuUsage {
            user: pct(end.user, start.user),
            nice: pct(end.nice, start.nice),
            system: pct(end.system, start.system),
            idle,
            iowait,
            irq: pct(end.irq, start.irq),
            softirq: pct(end.softirq, start.softirq),
            steal: pct(end.steal, start.steal),
            total: 100.0 - idle - iowait,
        })
    }
}

/// Computes CPU usage between two snapshots. See [`CpuDeltaCalculator::calculate`].
pub fn compute_cpu_delta(start: &CpuCounters, end: &CpuCounters) -> Result<CpuUsage, CollectError> {
    CpuDeltaCalculator::new().calculate(start, end)
}
