//! Session-scoped override store.
//!
//! Holds user decisions that supersede the heuristic for specific paths:
//! `Some(true)` pins a path as used, `Some(false)` pins it as unused and an
//! absent entry defers to the heuristic. The store is owned explicitly and
//! injected into the components that consult it; `reset_all` runs once at
//! process start so no stale decisions survive into a new session.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug, Default)]
pub struct OverrideStore {
    entries: Mutex<HashMap<PathBuf, bool>>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<PathBuf, bool>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The override for `path`, if any.
    pub fn status(&self, path: &Path) -> Option<bool> {
        self.entries().get(path).copied()
    }

    /// Whether the user pinned `path` as used. Absent entries answer false.
    pub fn is_marked_used(&self, path: &Path) -> bool {
        self.status(path) == Some(true)
    }

    pub fn set(&self, path: impl Into<PathBuf>, used: bool) {
        let path = path.into();
        debug!("Override {} = {}", path.display(), used);
        self.entries().insert(path, used);
    }

    /// Remove any override, returning `path` to heuristic evaluation on
    /// the next scan.
    pub fn clear(&self, path: &Path) {
        self.entries().remove(path);
    }

    /// Flip used/unused and return the new value. A path with no override
    /// toggles to used.
    pub fn toggle(&self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        let mut entries = self.entries();
        let next = !entries.get(&path).copied().unwrap_or(false);
        entries.insert(path, next);
        next
    }

    /// Discard every entry. Invoked once at process start.
    pub fn reset_all(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
