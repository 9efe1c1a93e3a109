//! Data models for collected metrics.

mod system;

pub use system::{CpuCounters, CpuUsage, MemoryInfo, StorageInfo, UptimeInfo};
