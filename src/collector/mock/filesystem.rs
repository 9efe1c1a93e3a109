//! In-memory mock filesystem for testing collectors without real `/proc`.
//!
//! This module provides `MockFs` which simulates a filesystem in memory,
//! allowing tests to run on macOS and in CI environments without Linux.

use crate::collector::traits::{FileSystem, FsStats};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// In-memory filesystem for testing.
///
/// Stores files, directories and mount statistics in memory. A file can also
/// be given a sequence of contents: each read returns the next one, and the
/// last one repeats. This is how tests make `/proc/stat` counters advance
/// between the two reads of an interval sample.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Map from path to successive file contents.
    sequences: HashMap<PathBuf, Vec<String>>,
    /// Number of reads served so far per sequenced path.
    cursors: Arc<Mutex<HashMap<PathBuf, usize>>>,
    /// Set of directories.
    directories: HashSet<PathBuf>,
    /// Map from mount point to its `statvfs` answer.
    mounts: HashMap<PathBuf, FsStats>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }

    /// Adds a file with the given content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.sequences.remove(&path);
        self.files.insert(path, content.into());
    }

    /// Adds a file whose content changes on every read.
    ///
    /// The n-th read returns `contents[n]`; once exhausted, the last entry is
    /// returned forever. An empty sequence behaves like a missing file.
    pub fn add_file_sequence<I, S>(&mut self, path: impl AsRef<Path>, contents: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.files.remove(&path);
        self.sequences
            .insert(path, contents.into_iter().map(Into::into).collect());
    }

    /// Removes a file, simulating a source that disappeared.
    pub fn remove_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.files.remove(path);
        self.sequences.remove(path);
    }

    /// Adds a mount point with the given filesystem statistics.
    pub fn add_mount(&mut self, path: impl AsRef<Path>, stats: FsStats) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.directories.insert(path.clone());
        self.mounts.insert(path, stats);
    }

    /// Loads `/proc` files from a directory snapshot (non-recursive).
    ///
    /// This is useful for regression tests with captured `/proc` files.
    pub fn from_snapshot(dir: &Path) -> io::Result<Self> {
        let mut fs = Self::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            // Skip binary files
            if let Ok(content) = std::fs::read_to_string(entry.path()) {
                fs.add_file(Path::new("/proc").join(entry.file_name()), content);
            }
        }
        Ok(fs)
    }

    /// Checks if a file or directory exists.
    pub fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
            || self.sequences.contains_key(path)
            || self.directories.contains(path)
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("file not found: {:?}", path),
        )
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        if let Some(content) = self.files.get(path) {
            return Ok(content.clone());
        }

        let seq = self.sequences.get(path).ok_or_else(|| Self::not_found(path))?;
        let mut cursors = self.cursors.lock().unwrap_or_else(PoisonError::into_inner);
        let cursor = cursors.entry(path.to_path_buf()).or_insert(0);
        let idx = (*cursor).min(seq.len().saturating_sub(1));
        *cursor += 1;
        seq.get(idx).cloned().ok_or_else(|| Self::not_found(path))
    }

    fn statvfs(&self, path: &Path) -> io::Result<FsStats> {
        if let Some(stats) = self.mounts.get(path) {
            return Ok(*stats);
        }
        if self.exists(path) {
            // Resolve to the closest mount above the path, like the kernel does.
            let mut parent = path.parent();
            while let Some(p) = parent {
                if let Some(stats) = self.mounts.get(p) {
                    return Ok(*stats);
                }
                parent = p.parent();
            }
        }
        Err(Self::not_found(path))
    }
}
