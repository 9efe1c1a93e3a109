//! Error type shared by every read and calculation in the crate.

use std::io;
use std::path::PathBuf;

/// Error type for collection and calculation failures.
///
/// None of these are retried internally; retry policy belongs to the caller.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// The metrics source could not be opened or queried.
    #[error("cannot access {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source was readable but did not have the expected shape.
    #[error("malformed {}: {reason}", path.display())]
    MalformedSource { path: PathBuf, reason: String },

    /// Counter totals did not advance between two snapshots.
    #[error("invalid interval or counter overflow: total went from {start} to {end} ticks")]
    InvalidInterval { start: u64, end: u64 },

    /// Requested sampling window is below the supported floor.
    #[error("sampling interval {0}s is below the {min}s minimum", min = crate::sampler::MIN_INTERVAL_SECS)]
    IntervalTooSmall(f64),

    /// Requested sampling window cannot be represented as a duration.
    #[error("sampling interval {0}s is out of range")]
    IntervalTooLarge(f64),

    /// `MemTotal` is zero, so no percentage can be derived.
    #[error("total memory is zero")]
    NoTotalMemory,
}

impl CollectError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CollectError::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CollectError::MalformedSource {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
