//! Derived memory statistics: used memory, used swap and percentage.

use crate::collector::CollectError;
use crate::diagnostics::Diagnostics;
use crate::model::MemoryInfo;

/// Fills the derived fields of a parsed [`MemoryInfo`].
#[derive(Debug, Clone, Default)]
pub struct MemUsageCalculator {
    diag: Diagnostics,
}

impl MemUsageCalculator {
    pub fn new(diag: Diagnostics) -> Self {
        Self { diag }
    }

    /// Computes `used`, `swap_used` and `percent_used` from the raw fields.
    ///
    /// `used` is `total - available` when the kernel reports `MemAvailable`.
    /// Without it (pre-3.14 kernels) the estimate falls back to
    /// `total - free - buffers - cached`, clamped to `[0, total]`, and a
    /// warning is reported. Swap usage is 0 on systems without swap.
    pub fn calculate(&self, mut info: MemoryInfo) -> Result<MemoryInfo, CollectError> {
        if info.total == 0 {
            return Err(CollectError::NoTotalMemory);
        }

        info.used = if info.available > 0 {
            info.total.saturating_sub(info.available)
        } else {
            self.diag.warn(
                "MemAvailable not reported, estimating used memory from free, buffers and cached",
            );
            info.total
                .saturating_sub(info.free)
                .saturating_sub(info.buffers)
                .saturating_sub(info.cached)
        };
        info.percent_used = info.used as f64 / info.total as f64 * 100.0;

        info.swap_used = if info.swap_total > 0 {
            info.swap_total.saturating_sub(info.swap_free)
        } else {
            0
        };

        Ok(info)
    }
}

/// Computes derived memory fields, reporting fallbacks to the global
/// diagnostic sink. See [`MemUsageCalculator::calculate`].
pub fn compute_memory_usage(info: MemoryInfo) -> Result<MemoryInfo, CollectError> {
    MemUsageCalculator::default().calculate(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Severity, capture};

    #[test]
    fn test_compute_memory_usage_available() {
        let (diag, events) = capture();
        let info = MemoryInfo {
            total: 1000,
            available: 400,
            ..MemoryInfo::default()
        };
        let info = MemUsageCalculator::new(diag).calculate(info).unwrap();

        assert_eq!(info.used, 600);
        assert!((info.percent_used - 60.0).abs() < 1e-9);
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_compute_memory_usage_fallback() {
        let (diag, events) = capture();
        let info = MemoryInfo {
            total: 1000,
            available: 0,
            free: 100,
            buffers: 50,
            cached: 50,
            ..MemoryInfo::default()
        };
        let info = MemUsageCalculator::new(diag).calculate(info).unwrap();

        assert_eq!(info.used, 800);
        assert!((info.percent_used - 80.0).abs() < 1e-9);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].severity, Severity::Warn);
    }

    #[test]
    fn test_compute_memory_usage_fallback_clamps_to_zero() {
        let info = MemoryInfo {
            total: 1000,
            free: 900,
            buffers: 200,
            cached: 300,
            ..MemoryInfo::default()
        };
        let info = MemUsageCalculator::new(Diagnostics::none())
            .calculate(info)
            .unwrap();

        assert_eq!(info.used, 0);
        assert_eq!(info.percent_used, 0.0);
    }

    #[test]
    fn test_compute_memory_usage_available_above_total() {
        let info = MemoryInfo {
            total: 1000,
            available: 1500,
            ..MemoryInfo::default()
        };
        let info = compute_memory_usage(info).unwrap();

        assert_eq!(info.used, 0);
        assert!(info.used <= info.total);
    }

    #[test]
    fn test_compute_memory_usage_no_total() {
        let info = MemoryInfo::default();
        assert!(matches!(
            compute_memory_usage(info),
            Err(CollectError::NoTotalMemory)
        ));
    }

    #[test]
    fn test_compute_memory_usage_swap() {
        let info = MemoryInfo {
            total: 1000,
            available: 500,
            swap_total: 4096,
            swap_free: 1024,
            ..MemoryInfo::default()
        };
        let info = compute_memory_usage(info).unwrap();
        assert_eq!(info.swap_used, 3072);

        // No swap configured: not an error.
        let info = MemoryInfo {
            total: 1000,
            available: 500,
            swap_free: 10,
            ..MemoryInfo::default()
        };
        let info = compute_memory_usage(info).unwrap();
        assert_eq!(info.swap_used, 0);
    }
}
