//! Pre-built mock filesystem scenarios for testing.
//!
//! These scenarios provide realistic `/proc` filesystem states
//! for testing various system conditions.

use super::filesystem::MockFs;
use crate::collector::traits::FsStats;

const TYPICAL_MEMINFO: &str = "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
Active:          4096000 kB
Inactive:        2048000 kB
Shmem:            256000 kB
SwapTotal:       4096000 kB
SwapFree:        4096000 kB
Dirty:              1024 kB
Writeback:             0 kB
Slab:             512000 kB
SReclaimable:     256000 kB
";

const TYPICAL_STAT: &str = "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2500 125 750 20000 250 50 25 0 0 0
cpu2 2500 125 750 20000 250 50 25 0 0 0
cpu3 2500 125 750 20000 250 50 25 0 0 0
intr 1000000 50 0 0 0 0 0 0 0 1 0 0 0 100 0 0 1000
ctxt 500000
btime 1700000000
processes 10000
procs_running 2
procs_blocked 0
";

/// 100 GiB root filesystem, 60 GiB free, 55 GiB available to users.
const ROOT_FS: FsStats = FsStats {
    fragment_size: 4096,
    blocks: 26_214_400,
    blocks_free: 15_728_640,
    blocks_available: 14_417_920,
};

impl MockFs {
    /// Creates a typical idle-ish system with static counters.
    ///
    /// `/proc/stat` never changes, so interval sampling on this scenario
    /// fails with `InvalidInterval`; use [`MockFs::busy_system`] for that.
    pub fn typical_system() -> Self {
        let mut fs = Self::new();

        fs.add_file("/proc/uptime", "12345.67 98765.43\n");
        fs.add_file("/proc/meminfo", TYPICAL_MEMINFO);
        fs.add_file("/proc/stat", TYPICAL_STAT);
        fs.add_mount("/", ROOT_FS);

        fs
    }

    /// Creates a system whose CPU counters advance between reads.
    ///
    /// Between the first and second read of `/proc/stat` the aggregate
    /// counters move by 1000 ticks: user 300, system 100, idle 550, iowait 50.
    pub fn busy_system() -> Self {
        let mut fs = Self::typical_system();

        fs.add_file_sequence(
            "/proc/stat",
            [
                TYPICAL_STAT.to_string(),
                "\
cpu  10300 500 3100 80550 1050 200 100 0 0 0
cpu0 2575 125 775 20137 262 50 25 0 0 0
ctxt 500900
"
                .to_string(),
            ],
        );

        fs
    }

    /// Creates an old-kernel system: no `MemAvailable`, no `Shmem`, and a
    /// 7-column `/proc/stat` without `steal`.
    pub fn legacy_kernel() -> Self {
        let mut fs = Self::typical_system();

        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:        2048000 kB
MemFree:          256000 kB
Buffers:          128000 kB
Cached:           512000 kB
SwapCached:            0 kB
SwapTotal:       1024000 kB
SwapFree:         512000 kB
",
        );
        fs.add_file("/proc/stat", "cpu  5000 100 2000 40000 500 50 25\n");

        fs
    }

    /// Creates a system with a truncated `/proc/stat` first line.
    pub fn truncated_stat() -> Self {
        let mut fs = Self::typical_system();
        fs.add_file("/proc/stat", "cpu  10000 500 3000 80000 1000\n");
        fs
    }

    /// Creates a system without swap configured.
    pub fn no_swap() -> Self {
        let mut fs = Self::typical_system();

        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:        8192000 kB
MemFree:         1024000 kB
MemAvailable:    2048000 kB
Buffers:          256000 kB
Cached:          1024000 kB
Shmem:             64000 kB
SwapTotal:             0 kB
SwapFree:              0 kB
",
        );

        fs
    }
}
