//! One-shot snapshot of every metric family.

use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::collector::{FileSystem, SystemCollector};
use crate::memory::MemUsageCalculator;
use crate::model::{CpuUsage, MemoryInfo, StorageInfo, UptimeInfo};

/// Everything the crate can measure, collected at one point in time.
///
/// Each section is `None` when its source failed; the failure has already
/// been reported through the collector's diagnostics.
#[derive(Debug, Clone, Serialize, Default)]
pub struct SystemReport {
    /// Unix timestamp (seconds, UTC) taken after the CPU sample completed.
    pub timestamp: i64,
    pub cpu: Option<CpuUsage>,
    pub memory: Option<MemoryInfo>,
    /// Number of recognized `/proc/meminfo` keys; 0 when meminfo was unreadable.
    pub memory_fields_found: usize,
    pub storage: Option<StorageInfo>,
    pub uptime: Option<UptimeInfo>,
}

impl SystemReport {
    /// Samples CPU over `interval_secs`, then reads memory, storage for
    /// `mount` and uptime.
    pub fn collect<F: FileSystem>(
        collector: &SystemCollector<F>,
        interval_secs: f64,
        mount: impl AsRef<Path>,
    ) -> Self {
        let mut report = SystemReport::default();

        match collector.sample_cpu_usage(interval_secs) {
            Ok(usage) => report.cpu = Some(usage),
            Err(e) => debug!("cpu section skipped: {}", e),
        }

        match collector.read_memory_info() {
            Ok((info, found)) => {
                report.memory_fields_found = found;
                match MemUsageCalculator::new(collector.diagnostics().clone()).calculate(info) {
                    Ok(info) => report.memory = Some(info),
                    Err(e) => debug!("memory section skipped: {}", e),
                }
            }
            Err(e) => debug!("memory section skipped: {}", e),
        }

        match collector.read_storage_info(mount) {
            Ok(info) => report.storage = Some(info),
            Err(e) => debug!("storage section skipped: {}", e),
        }

        match collector.read_uptime() {
            Ok(info) => report.uptime = Some(info),
            Err(e) => debug!("uptime section skipped: {}", e),
        }

        report.timestamp = Utc::now().timestamp();
        report
    }

    /// True when every section was collected.
    pub fn is_complete(&self) -> bool {
        self.cpu.is_some() && self.memory.is_some() && self.storage.is_some() && self.uptime.is_some()
    }
}
