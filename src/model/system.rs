//! System-wide metrics derived from `/proc` and `statvfs`.
//!
//! Raw structures (`CpuCounters`) hold cumulative kernel counters as read;
//! derived structures (`CpuUsage`, the computed half of `MemoryInfo`,
//! `StorageInfo`) hold normalized values for one point or interval in time.

use serde::{Deserialize, Serialize};

/// Aggregate CPU time counters from the first line of `/proc/stat`.
///
/// Source: `/proc/stat` line `cpu  user nice system idle iowait irq softirq steal ...`
///
/// Each counter is cumulative time in jiffies (clock ticks) since boot.
/// Two snapshots are only comparable when taken from the same source in
/// temporal order.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct CpuCounters {
    /// Time spent in user mode.
    pub user: u64,
    /// Time spent in user mode with low priority (nice).
    pub nice: u64,
    /// Time spent in kernel mode.
    pub system: u64,
    /// Time spent idle.
    pub idle: u64,
    /// Time waiting for I/O to complete.
    pub iowait: u64,
    /// Time servicing hardware interrupts.
    pub irq: u64,
    /// Time servicing software interrupts.
    pub softirq: u64,
    /// Time stolen by the hypervisor for other guests.
    pub steal: u64,
}

impl CpuCounters {
    /// Sum of all eight counters.
    ///
    /// Saturates instead of wrapping; a saturated total can never compare as
    /// an advancing interval against itself.
    pub fn total(&self) -> u64 {
        self.as_array()
            .into_iter()
            .fold(0u64, |acc, v| acc.saturating_add(v))
    }

    /// Counters in `/proc/stat` column order.
    pub fn as_array(&self) -> [u64; 8] {
        [
            self.user,
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
        ]
    }

    /// Builds counters from values in `/proc/stat` column order.
    pub fn from_array(v: [u64; 8]) -> Self {
        Self {
            user: v[0],
            nice: v[1],
            system: v[2],
            idle: v[3],
            iowait: v[4],
            irq: v[5],
            softirq: v[6],
            steal: v[7],
        }
    }
}

/// CPU time breakdown over an interval, in percent (0-100).
///
/// `total` is busy time: `100 - idle - iowait`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct CpuUsage {
    pub user: f64,
    pub nice: f64,
    pub system: f64,
    pub idle: f64,
    pub iowait: f64,
    pub irq: f64,
    pub softirq: f64,
    pub steal: f64,
    pub total: f64,
}

/// Memory and swap statistics, all sizes in KiB.
///
/// Source: `/proc/meminfo`
///
/// The raw fields are filled by the parser; a key missing from the source
/// leaves its field at 0. `used`, `swap_used` and `percent_used` stay 0 until
/// [`compute_memory_usage`](crate::memory::compute_memory_usage) succeeds.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct MemoryInfo {
    /// Total usable RAM (`MemTotal`).
    pub total: u64,
    /// Completely unused RAM (`MemFree`).
    pub free: u64,
    /// Kernel estimate of memory available without swapping (`MemAvailable`).
    pub available: u64,
    /// Block device buffers (`Buffers`).
    pub buffers: u64,
    /// Page cache, excluding swap cache (`Cached`).
    pub cached: u64,
    /// Shared memory and tmpfs (`Shmem`).
    pub shared: u64,
    /// Total swap space (`SwapTotal`).
    pub swap_total: u64,
    /// Unused swap space (`SwapFree`).
    pub swap_free: u64,

    /// Derived: memory in use.
    pub used: u64,
    /// Derived: swap in use.
    pub swap_used: u64,
    /// Derived: `used / total * 100`.
    pub percent_used: f64,
}

/// Capacity of one mounted filesystem, in bytes.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct StorageInfo {
    pub total: u64,
    /// Free bytes including blocks reserved for root.
    pub free: u64,
    /// Free bytes available to unprivileged users.
    pub available: u64,
    pub used: u64,
    pub percent_usage: f64,
}

/// Seconds since boot and cumulative idle seconds.
///
/// Source: `/proc/uptime`
///
/// `idle_time` is summed across cores and may exceed `uptime`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct UptimeInfo {
    pub uptime: f64,
    pub idle_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_counters_total() {
        let c = CpuCounters::from_array([10000, 500, 3000, 80000, 1000, 200, 100, 0]);
        assert_eq!(c.total(), 94800);
        assert_eq!(c.as_array()[3], 80000);
    }

    #[test]
    fn test_cpu_counters_total_saturates() {
        let c = CpuCounters {
            user: u64::MAX,
            idle: 5,
            ..CpuCounters::default()
        };
        assert_eq!(c.total(), u64::MAX);
    }

    #[test]
    fn test_memory_info_serializes_field_names() {
        let info = MemoryInfo {
            total: 1000,
            swap_total: 10,
            ..MemoryInfo::default()
        };
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["total"], 1000);
        assert_eq!(json["swap_total"], 10);
        assert_eq!(json["percent_used"], 0.0);
    }
}
