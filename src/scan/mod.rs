//! Scan orchestration.
//!
//! Drives the walker and the reference heuristic in bounded batches,
//! reports progress, and keeps the last result set current when files are
//! deleted out from under it. Scans are not re-entrant; callers serialize
//! scan requests.

mod refresh;

pub use refresh::RefreshDebouncer;

use crate::config::Config;
use crate::discovery::TreeWalker;
use crate::engine::{CancelFlag, ContentIndex, ReferenceScanner};
use crate::overrides::OverrideStore;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, info};

/// Candidate files classified per batch. Bounds the cost of a single
/// heuristic step and sets the granularity of progress and cancellation.
pub const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Project root not found or not a directory: {0}")]
    MissingRoot(PathBuf),
}

/// Where a scan currently is, surfaced through progress messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPhase {
    #[default]
    Idle,
    Configuring,
    Walking,
    Indexing,
    Batching,
    Aggregating,
    Done,
    Cancelled,
}

impl ScanPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanPhase::Idle => "idle",
            ScanPhase::Configuring => "configuring",
            ScanPhase::Walking => "walking",
            ScanPhase::Indexing => "indexing",
            ScanPhase::Batching => "batching",
            ScanPhase::Aggregating => "aggregating",
            ScanPhase::Done => "done",
            ScanPhase::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Progress snapshot delivered after each completed batch.
#[derive(Debug, Clone)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
    pub message: String,
}

/// Final (or partial, when cancelled) result of a scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Paths classified unused, in candidate order
    pub unused_files: Vec<PathBuf>,

    /// True when the scan stopped at a cancellation point. The result then
    /// covers only the candidates evaluated before the flag was observed.
    pub cancelled: bool,
}

pub struct ScanOrchestrator {
    overrides: Arc<OverrideStore>,
    config: Option<Config>,
    batch_size: usize,
    phase: Mutex<ScanPhase>,
    results: Mutex<Vec<PathBuf>>,
    refresh: Option<RefreshDebouncer>,
}

impl ScanOrchestrator {
    pub fn new(overrides: Arc<OverrideStore>) -> Self {
        Self {
            overrides,
            config: None,
            batch_size: DEFAULT_BATCH_SIZE,
            phase: Mutex::new(ScanPhase::Idle),
            results: Mutex::new(Vec::new()),
            refresh: None,
        }
    }

    /// Use a pre-resolved configuration instead of resolving one from the
    /// project root at scan time.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Attach a debounced refresh hook, triggered after toggle/reset so a
    /// burst of toggles coalesces into one visible update.
    pub fn with_refresh(mut self, refresh: RefreshDebouncer) -> Self {
        self.refresh = Some(refresh);
        self
    }

    pub fn phase(&self) -> ScanPhase {
        *lock(&self.phase)
    }

    fn set_phase(&self, phase: ScanPhase) {
        debug!("Scan phase: {}", phase);
        *lock(&self.phase) = phase;
    }

    /// Run a full scan of `root`.
    ///
    /// `progress` is invoked once the candidate count is known and again
    /// after each completed batch. Cancellation is cooperative: the engine
    /// finishes the candidate it is on, the accumulated partial result is
    /// returned and `cancelled` is set instead of raising an error. A
    /// missing root is the one fatal error.
    pub fn scan<F>(
        &self,
        root: &Path,
        mut progress: F,
        cancel: &CancelFlag,
    ) -> Result<ScanOutcome, ScanError>
    where
        F: FnMut(Progress),
    {
        self.set_phase(ScanPhase::Configuring);
        let root = std::fs::canonicalize(root)
            .map_err(|_| ScanError::MissingRoot(root.to_path_buf()))?;
        if !root.is_dir() {
            return Err(ScanError::MissingRoot(root));
        }
        let config = match &self.config {
            Some(config) => config.clone(),
            None => Config::resolve(&root),
        };

        self.set_phase(ScanPhase::Walking);
        let walker = TreeWalker::new(&config);
        let candidates = walker.tracked_files(&root);
        let total = candidates.len();
        info!("Tracking {} candidate files under {}", total, root.display());
        progress(Progress {
            processed: 0,
            total,
            message: format!("Scanning {} tracked files", total),
        });

        self.set_phase(ScanPhase::Indexing);
        let tracked: Vec<PathBuf> = candidates.iter().map(|c| c.path.clone()).collect();
        let index = ContentIndex::build(&tracked);

        self.set_phase(ScanPhase::Batching);
        let scanner = ReferenceScanner::new(&index, &self.overrides);
        let mut unused = Vec::new();
        let mut processed = 0;
        let mut cancelled = false;

        for batch in candidates.chunks(self.batch_size) {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            unused.extend(scanner.find_unused(batch, cancel));

            if cancel.is_cancelled() {
                // The engine stopped partway through this batch; whatever
                // it fully evaluated is already in `unused`.
                cancelled = true;
                break;
            }

            processed += batch.len();
            progress(Progress {
                processed,
                total,
                message: format!("Checked {processed}/{total} files"),
            });
        }

        self.set_phase(ScanPhase::Aggregating);
        *lock(&self.results) = unused.clone();

        let outcome = ScanOutcome {
            unused_files: unused,
            cancelled,
        };
        self.set_phase(if cancelled {
            ScanPhase::Cancelled
        } else {
            ScanPhase::Done
        });
        info!(
            "Scan {}: {} unused of {} tracked files",
            if cancelled { "cancelled" } else { "complete" },
            outcome.unused_files.len(),
            total
        );
        Ok(outcome)
    }

    /// Snapshot of the last scan's unused list, minus any paths pruned by
    /// [`ScanOrchestrator::on_delete`] since.
    pub fn unused_files(&self) -> Vec<PathBuf> {
        lock(&self.results).clone()
    }

    /// React to an externally observed deletion: drop `path` from the
    /// current result set without rescanning. Unknown paths are a no-op.
    pub fn on_delete(&self, path: &Path) {
        let mut results = lock(&self.results);
        let before = results.len();
        results.retain(|p| p != path);
        if results.len() != before {
            debug!("Pruned deleted file {}", path.display());
        }
    }

    /// Flip the override for `path` and schedule a coalesced refresh.
    /// Fire-and-forget relative to any in-flight scan; the change is
    /// reflected on the next scan.
    pub fn toggle(&self, path: impl Into<PathBuf>) -> bool {
        let value = self.overrides.toggle(path);
        self.request_refresh();
        value
    }

    /// Clear the override for `path`, returning it to heuristic
    /// evaluation on the next scan.
    pub fn reset(&self, path: &Path) {
        self.overrides.clear(path);
        self.request_refresh();
    }

    /// Per-file override status, for presentation layers.
    pub fn override_status(&self, path: &Path) -> Option<bool> {
        self.overrides.status(path)
    }

    fn request_refresh(&self) {
        if let Some(refresh) = &self.refresh {
            refresh.trigger();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
