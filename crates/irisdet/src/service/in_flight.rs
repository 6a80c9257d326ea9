use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Tracks detections that are running for image files.
///
/// Jobs are keyed by the path they were started with. A file moved while
/// its job runs is redirected so the result lands at the new path; a deleted
/// file is discarded so no result is written.
pub trait InFlightTracker: Send + Sync {
    /// Register a job for `path`. Returns `false` if a job for the same file
    /// (under its original or redirected name) is already running.
    fn try_begin(&self, path: &Path) -> bool;

    /// The in-flight file at `from` was moved to `to`.
    fn redirect(&self, from: &Path, to: &Path);

    /// The in-flight file at `path` was deleted.
    fn discard(&self, path: &Path);

    /// Finish the job started for `original`.
    ///
    /// Returns the path the result should be written to, or `None` when the
    /// job was discarded or never registered.
    fn end(&self, original: &Path) -> Option<PathBuf>;
}

#[derive(Debug, Clone)]
struct Entry {
    current: PathBuf,
    discarded: bool,
}

/// In-process [`InFlightTracker`].
#[derive(Debug, Default)]
pub struct InFlightRegistry {
    entries: Mutex<HashMap<PathBuf, Entry>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of running jobs.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Entry>> {
        // Entries stay consistent across a panicking holder: every update is
        // a single field write.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Every job currently known under `path`, by original or redirected name.
///
/// A file moved onto another in-flight file's name leaves two jobs sharing
/// that name; events for it reach both.
fn matching<'a>(
    entries: &'a mut HashMap<PathBuf, Entry>,
    path: &'a Path,
) -> impl Iterator<Item = &'a mut Entry> + 'a {
    entries
        .iter_mut()
        .filter(move |(original, e)| e.current == path || original.as_path() == path)
        .map(|(_, e)| e)
}

impl InFlightTracker for InFlightRegistry {
    fn try_begin(&self, path: &Path) -> bool {
        let mut entries = self.lock();
        if matching(&mut entries, path).next().is_some() {
            tracing::debug!("detection already running for {}", path.display());
            return false;
        }
        entries.insert(
            path.to_path_buf(),
            Entry {
                current: path.to_path_buf(),
                discarded: false,
            },
        );
        true
    }

    fn redirect(&self, from: &Path, to: &Path) {
        let mut entries = self.lock();
        for entry in matching(&mut entries, from) {
            tracing::debug!("redirect {} -> {}", from.display(), to.display());
            entry.current = to.to_path_buf();
        }
    }

    fn discard(&self, path: &Path) {
        let mut entries = self.lock();
        for entry in matching(&mut entries, path) {
            tracing::debug!("discard {}", path.display());
            entry.discarded = true;
        }
    }

    fn end(&self, original: &Path) -> Option<PathBuf> {
        let entry = self.lock().remove(original)?;
        (!entry.discarded).then_some(entry.current)
    }
}
