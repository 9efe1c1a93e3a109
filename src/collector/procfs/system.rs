//! System collector for gathering global system metrics from `/proc/` and `statvfs`.

use std::path::{Path, PathBuf};

use crate::collector::error::CollectError;
use crate::collector::procfs::parser::{
    EXPECTED_MEMINFO_KEYS, parse_cpu_counters, parse_meminfo, parse_uptime,
};
use crate::collector::traits::FileSystem;
use crate::diagnostics::Diagnostics;
use crate::model::{CpuCounters, CpuUsage, MemoryInfo, StorageInfo, UptimeInfo};
use crate::sampler::{CounterSource, IntervalSampler};

/// Collects system-wide metrics from `/proc/`.
///
/// Every operation is a fresh read; nothing is cached between calls.
pub struct SystemCollector<F: FileSystem> {
    fs: F,
    proc_path: PathBuf,
    diag: Diagnostics,
}

impl<F: FileSystem> SystemCollector<F> {
    /// Creates a new system collector reporting to the global diagnostic sink.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
            diag: Diagnostics::global(),
        }
    }

    /// Replaces the diagnostics handle.
    pub fn with_diagnostics(mut self, diag: Diagnostics) -> Self {
        self.diag = diag;
        self
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }

    fn read_proc(&self, name: &str) -> Result<(PathBuf, String), CollectError> {
        let path = self.proc_path.join(name);
        match self.fs.read_to_string(&path) {
            Ok(content) => Ok((path, content)),
            Err(e) => {
                self.diag
                    .error(format!("can't open {}: {}", path.display(), e));
                Err(CollectError::unavailable(path, e))
            }
        }
    }

    /// Reads the aggregate CPU counters from `/proc/stat`.
    pub fn read_cpu_snapshot(&self) -> Result<CpuCounters, CollectError> {
        let (path, content) = self.read_proc("stat")?;
        parse_cpu_counters(&content).map_err(|e| {
            self.diag
                .error(format!("failed to parse {}: {}", path.display(), e.message));
            CollectError::malformed(path, e.message)
        })
    }

    /// Measures CPU usage over `interval_secs` seconds (at least 0.1).
    ///
    /// Blocks the calling thread for the whole interval.
    pub fn sample_cpu_usage(&self, interval_secs: f64) -> Result<CpuUsage, CollectError> {
        IntervalSampler::new()
            .sample(self, interval_secs)
            .inspect_err(|e| match e {
                // Read failures were already reported by read_cpu_snapshot.
                CollectError::SourceUnavailable { .. } | CollectError::MalformedSource { .. } => {}
                other => self.diag.error(format!("CPU sampling failed: {}", other)),
            })
            .inspect(|usage| {
                self.diag.info(format!(
                    "CPU sampled over {}s: {:.2}% busy",
                    interval_secs, usage.total
                ))
            })
    }

    /// Reads `/proc/meminfo` and returns the raw fields with the number of
    /// recognized keys found.
    ///
    /// A partial source is not an error: missing keys stay at 0 and a warning
    /// is reported. Derived fields are left at 0; see
    /// [`compute_memory_usage`](crate::memory::compute_memory_usage).
    pub fn read_memory_info(&self) -> Result<(MemoryInfo, usize), CollectError> {
        let (path, content) = self.read_proc("meminfo")?;
        let (info, found) = parse_meminfo(content.lines());

        if found < EXPECTED_MEMINFO_KEYS {
            self.diag.warn(format!(
                "{}: found {} of {} expected fields",
                path.display(),
                found,
                EXPECTED_MEMINFO_KEYS
            ));
        }

        Ok((info, found))
    }

    /// Queries capacity of the filesystem mounted at `path`.
    pub fn read_storage_info(&self, path: impl AsRef<Path>) -> Result<StorageInfo, CollectError> {
        let path = path.as_ref();
        let stats = self.fs.statvfs(path).map_err(|e| {
            self.diag
                .error(format!("statvfs failed for {}: {}", path.display(), e));
            CollectError::unavailable(path, e)
        })?;

        let total = stats.blocks.saturating_mul(stats.fragment_size);
        let free = stats.blocks_free.saturating_mul(stats.fragment_size);
        let available = stats.blocks_available.saturating_mul(stats.fragment_size);
        let used = total.saturating_sub(free);
        let percent_usage = if total > 0 {
            used as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Ok(StorageInfo {
            total,
            free,
            available,
            used,
            percent_usage,
        })
    }

    /// Reads seconds since boot and cumulative idle seconds from `/proc/uptime`.
    pub fn read_uptime(&self) -> Result<UptimeInfo, CollectError> {
        let (path, content) = self.read_proc("uptime")?;
        parse_uptime(&content).map_err(|e| {
            self.diag
                .error(format!("failed to parse {}: {}", path.display(), e.message));
            CollectError::malformed(path, e.message)
        })
    }
}

impl<F: FileSystem> CounterSource for SystemCollector<F> {
    fn read_cpu_snapshot(&self) -> Result<CpuCounters, CollectError> {
        SystemCollector::read_cpu_snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;
    use crate::collector::traits::FsStats;
    use crate::diagnostics::{Severity, capture};
    use crate::memory::MemUsageCalculator;

    fn collector(fs: MockFs) -> SystemCollector<MockFs> {
        SystemCollector::new(fs, "/proc").with_diagnostics(Diagnostics::none())
    }

    #[test]
    fn test_read_cpu_snapshot() {
        let snap = collector(MockFs::typical_system())
            .read_cpu_snapshot()
            .unwrap();

        assert_eq!(snap.user, 10000);
        assert_eq!(snap.idle, 80000);
        assert_eq!(snap.steal, 0);
    }

    #[test]
    fn test_read_cpu_snapshot_missing_source() {
        let (diag, events) = capture();
        let collector = SystemCollector::new(MockFs::new(), "/proc").with_diagnostics(diag);

        let err = collector.read_cpu_snapshot().unwrap_err();
        assert!(matches!(
            err,
            CollectError::SourceUnavailable { ref path, .. } if path == Path::new("/proc/stat")
        ));
        assert_eq!(events.lock().unwrap()[0].severity, Severity::Error);
    }

    #[test]
    fn test_read_cpu_snapshot_truncated() {
        let err = collector(MockFs::truncated_stat())
            .read_cpu_snapshot()
            .unwrap_err();
        assert!(matches!(err, CollectError::MalformedSource { .. }));

        let err = collector(MockFs::legacy_kernel())
            .read_cpu_snapshot()
            .unwrap_err();
        assert!(matches!(err, CollectError::MalformedSource { .. }));
    }

    #[test]
    fn test_read_cpu_snapshot_custom_proc_path() {
        let mut fs = MockFs::new();
        fs.add_file("/host/proc/stat", "cpu 1 2 3 4 5 6 7 8\n");
        let collector = SystemCollector::new(fs, "/host/proc");

        assert_eq!(collector.read_cpu_snapshot().unwrap().steal, 8);
    }

    #[test]
    fn test_sample_cpu_usage_busy() {
        let usage = collector(MockFs::busy_system())
            .sample_cpu_usage(0.1)
            .unwrap();

        assert!((usage.user - 30.0).abs() < 1e-9);
        assert!((usage.system - 10.0).abs() < 1e-9);
        assert!((usage.idle - 55.0).abs() < 1e-9);
        assert!((usage.iowait - 5.0).abs() < 1e-9);
        assert!((usage.total - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_sample_cpu_usage_reports_info() {
        let (diag, events) = capture();
        let collector =
            SystemCollector::new(MockFs::busy_system(), "/proc").with_diagnostics(diag);

        collector.sample_cpu_usage(0.1).unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].severity, Severity::Info);
        assert!(events[0].message.contains("40.00% busy"));
    }

    #[test]
    fn test_sample_cpu_usage_static_counters() {
        let (diag, events) = capture();
        let collector =
            SystemCollector::new(MockFs::typical_system(), "/proc").with_diagnostics(diag);

        let err = collector.sample_cpu_usage(0.1).unwrap_err();
        assert!(matches!(err, CollectError::InvalidInterval { .. }));
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_sample_cpu_usage_too_small() {
        let err = collector(MockFs::busy_system())
            .sample_cpu_usage(0.01)
            .unwrap_err();
        assert!(matches!(err, CollectError::IntervalTooSmall(_)));
    }

    #[test]
    fn test_read_memory_info() {
        let (info, found) = collector(MockFs::typical_system())
            .read_memory_info()
            .unwrap();

        assert_eq!(found, EXPECTED_MEMINFO_KEYS);
        assert_eq!(info.total, 16384000);
        assert_eq!(info.free, 8192000);
        assert_eq!(info.available, 12000000);
        assert_eq!(info.shared, 256000);
        assert_eq!(info.used, 0);
    }

    #[test]
    fn test_read_memory_info_legacy_kernel() {
        let (diag, events) = capture();
        let collector =
            SystemCollector::new(MockFs::legacy_kernel(), "/proc").with_diagnostics(diag.clone());

        let (info, found) = collector.read_memory_info().unwrap();
        assert_eq!(found, 6);
        assert_eq!(info.available, 0);
        assert_eq!(info.shared, 0);

        let info = MemUsageCalculator::new(diag).calculate(info).unwrap();
        // 2048000 - 256000 - 128000 - 512000
        assert_eq!(info.used, 1152000);
        assert!((info.percent_used - 56.25).abs() < 1e-9);
        assert_eq!(info.swap_used, 512000);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.severity == Severity::Warn));
    }

    #[test]
    fn test_read_memory_info_no_swap() {
        let collector = collector(MockFs::no_swap());
        let (info, found) = collector.read_memory_info().unwrap();
        assert_eq!(found, EXPECTED_MEMINFO_KEYS);
        assert_eq!(info.swap_total, 0);

        let info = MemUsageCalculator::new(Diagnostics::none())
            .calculate(info)
            .unwrap();
        assert_eq!(info.swap_used, 0);
        assert_eq!(info.used, 8192000 - 2048000);
        assert!((info.percent_used - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_read_memory_info_missing_source() {
        let err = collector(MockFs::new()).read_memory_info().unwrap_err();
        assert!(matches!(err, CollectError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_read_storage_info() {
        let info = collector(MockFs::typical_system())
            .read_storage_info("/")
            .unwrap();

        assert_eq!(info.total, 100 * 1024 * 1024 * 1024);
        assert_eq!(info.free, 60 * 1024 * 1024 * 1024);
        assert_eq!(info.available, 55 * 1024 * 1024 * 1024);
        assert_eq!(info.used, 40 * 1024 * 1024 * 1024);
        assert!((info.percent_usage - 40.0).abs() < 1e-9);
        assert!(info.used <= info.total);
    }

    #[test]
    fn test_read_storage_info_empty_fs() {
        let mut fs = MockFs::new();
        fs.add_mount("/empty", FsStats::default());
        let info = collector(fs).read_storage_info("/empty").unwrap();

        assert_eq!(info.total, 0);
        assert_eq!(info.percent_usage, 0.0);
    }

    #[test]
    fn test_read_storage_info_missing_path() {
        let err = collector(MockFs::typical_system())
            .read_storage_info("/notexistfolder")
            .unwrap_err();
        assert!(matches!(err, CollectError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_read_uptime() {
        let info = collector(MockFs::typical_system()).read_uptime().unwrap();
        assert!((info.uptime - 12345.67).abs() < 1e-9);
        assert!((info.idle_time - 98765.43).abs() < 1e-9);
    }

    #[test]
    fn test_read_uptime_malformed() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/uptime", "garbage\n");
        let err = collector(fs).read_uptime().unwrap_err();
        assert!(matches!(err, CollectError::MalformedSource { .. }));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_real_proc() {
        use crate::collector::traits::RealFs;

        let collector = SystemCollector::new(RealFs::new(), "/proc")
            .with_diagnostics(Diagnostics::none());

        let usage = collector.sample_cpu_usage(0.1).unwrap();
        assert!((usage.total + usage.idle + usage.iowait - 100.0).abs() < 1e-3);

        let (info, found) = collector.read_memory_info().unwrap();
        assert!(found >= 6);
        assert!(info.total > 0);

        let uptime = collector.read_uptime().unwrap();
        assert!(uptime.uptime > 0.0);

        let dir = tempfile::tempdir().unwrap();
        let storage = collector.read_storage_info(dir.path()).unwrap();
        assert!(storage.used <= storage.total);
    }
}
