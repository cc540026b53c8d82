//! Change detection for `rescan = "skip_processed"`.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::pipeline::hash::content_hash;

/// Remembers the content hash each path had when it was last enqueued.
#[derive(Debug, Default)]
pub struct ProcessedTracker {
    seen: Mutex<HashMap<PathBuf, blake3::Hash>>,
}

impl ProcessedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `path` is new or changed since it was last enqueued.
    ///
    /// Records the current hash when returning `true`. Files that cannot be
    /// hashed are always let through so the pipeline reports the error.
    pub fn should_enqueue(&self, path: &Path) -> bool {
        let hash = match content_hash(path) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::debug!("Cannot hash {:?}: {}", path, e);
                return true;
            }
        };
        let mut seen = self.seen.lock();
        if seen.get(path) == Some(&hash) {
            return false;
        }
        seen.insert(path.to_path_buf(), hash);
        true
    }

    /// Drop entries for paths missing from the latest scan, so the map stays
    /// bounded by the current contents of the input directory.
    ///
    /// A file that is removed and later re-added is treated as new.
    pub fn retain_present(&self, present: &[PathBuf]) {
        let present: HashSet<&Path> = present.iter().map(PathBuf::as_path).collect();
        let mut seen = self.seen.lock();
        let before = seen.len();
        seen.retain(|path, _| present.contains(path.as_path()));
        if seen.len() < before {
            tracing::debug!("Forgot {} removed path(s)", before - seen.len());
        }
    }

    /// Number of distinct paths recorded.
    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
