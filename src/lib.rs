//! sysload - Linux system load and resource metrics.
//!
//! Reads CPU, memory, storage and uptime figures from the kernel:
//! - CPU utilization as a counter delta over a sampled interval (`/proc/stat`)
//! - memory and swap usage (`/proc/meminfo`)
//! - filesystem capacity (`statvfs`)
//! - uptime and idle time (`/proc/uptime`)
//!
//! The free functions below read the real `/proc` and report through the
//! process-wide diagnostic sink. [`SystemCollector`] offers the same
//! operations over any [`FileSystem`] and proc root.

pub mod collector;
pub mod diagnostics;
pub mod fmt;
pub mod memory;
pub mod model;
pub mod rates;
pub mod report;
pub mod sampler;

use std::path::Path;

pub use collector::{CollectError, FileSystem, MockFs, RealFs, SystemCollector};
pub use diagnostics::{
    Diagnostic, DiagnosticSink, Diagnostics, Severity, clear_diagnostic_sink, set_diagnostic_sink,
};
pub use memory::compute_memory_usage;
pub use model::{CpuCounters, CpuUsage, MemoryInfo, StorageInfo, UptimeInfo};
pub use rates::compute_cpu_delta;
pub use report::SystemReport;

const PROC_PATH: &str = "/proc";

fn system() -> SystemCollector<RealFs> {
    SystemCollector::new(RealFs::new(), PROC_PATH)
}

/// Reads the aggregate CPU counters from `/proc/stat`.
pub fn read_cpu_snapshot() -> Result<CpuCounters, CollectError> {
    system().read_cpu_snapshot()
}

/// Measures CPU usage over `interval_secs` seconds. Blocks for the interval.
pub fn sample_cpu_usage(interval_secs: f64) -> Result<CpuUsage, CollectError> {
    system().sample_cpu_usage(interval_secs)
}

/// Reads `/proc/meminfo`, returning raw fields and the number of recognized
/// keys found.
pub fn read_memory_info() -> Result<(MemoryInfo, usize), CollectError> {
    system().read_memory_info()
}

/// Queries capacity of the filesystem containing `path`.
pub fn read_storage_info(path: impl AsRef<Path>) -> Result<StorageInfo, CollectError> {
    system().read_storage_info(path)
}

/// Reads `/proc/uptime`.
pub fn read_uptime() -> Result<UptimeInfo, CollectError> {
    system().read_uptime()
}
