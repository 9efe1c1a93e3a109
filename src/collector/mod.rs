//! System metrics collector for Linux.
//!
//! This module reads the kernel's metric sources (`/proc/stat`,
//! `/proc/meminfo`, `/proc/uptime`, `statvfs`) through a [`FileSystem`]
//! abstraction, so every reader can be exercised against [`MockFs`] on any
//! platform.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SystemCollector                        │
//! │  - /proc/stat      -> CpuCounters -> IntervalSampler        │
//! │  - /proc/meminfo   -> MemoryInfo  -> MemUsageCalculator     │
//! │  - /proc/uptime    -> UptimeInfo                            │
//! │  - statvfs(mount)  -> StorageInfo                           │
//! │                            │                                │
//! │                     ┌──────▼──────┐                         │
//! │                     │  FileSystem │ (trait)                 │
//! │                     └──────┬──────┘                         │
//! └────────────────────────────┼────────────────────────────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              │               │               │
//!       ┌──────▼──────┐ ┌──────▼──────┐ ┌──────▼──────┐
//!       │   RealFs    │ │   MockFs    │ │  Scenarios  │
//!       │ (Linux)     │ │ (Testing)   │ │ (Fixtures)  │
//!       └─────────────┘ └─────────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production (Linux)
//!
//! ```ignore
//! use sysload::collector::{RealFs, SystemCollector};
//!
//! let collector = SystemCollector::new(RealFs::new(), "/proc");
//! let usage = collector.sample_cpu_usage(1.0).unwrap();
//! ```
//!
//! ## Testing (with MockFs)
//!
//! ```
//! use sysload::collector::{MockFs, SystemCollector};
//!
//! let collector = SystemCollector::new(MockFs::busy_system(), "/proc");
//! let usage = collector.sample_cpu_usage(0.1).unwrap();
//! assert!((usage.total - 40.0).abs() < 1e-9);
//! ```

pub mod error;
pub mod mock;
pub mod procfs;
pub mod traits;

pub use error::CollectError;
pub use mock::MockFs;
pub use procfs::SystemCollector;
pub use traits::{FileSystem, FsStats, RealFs};
