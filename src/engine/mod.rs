//! Reference heuristic engine.
//!
//! A candidate counts as used as soon as its base name or stem appears as a
//! substring of any other tracked file's content. This is a textual
//! heuristic, not semantic resolution: a stem showing up in an unrelated
//! comment keeps a file alive, because flagging a live file for deletion is
//! a worse failure than missing a dead one.

use crate::discovery::CandidateFile;
use crate::overrides::OverrideStore;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Shared advisory cancellation flag.
///
/// Polled at batch and candidate boundaries, never preemptive: in-flight
/// reads complete, and the flag only decides whether the next unit of work
/// starts.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug)]
struct IndexedFile {
    path: PathBuf,
    contents: String,
}

/// Decoded contents of every tracked file, built once per scan.
///
/// Each candidate then scans memory instead of re-reading the rest of the
/// tree, keeping the quadratic candidate-by-file pass I/O-free.
#[derive(Debug, Default)]
pub struct ContentIndex {
    files: Vec<IndexedFile>,
}

impl ContentIndex {
    /// Read and decode every file in `paths`. Unreadable files index as
    /// empty strings and therefore contribute no matches.
    pub fn build(paths: &[PathBuf]) -> Self {
        let files: Vec<IndexedFile> = paths
            .par_iter()
            .map(|path| IndexedFile {
                path: path.clone(),
                contents: read_lossy(path),
            })
            .collect();

        debug!("Indexed {} files", files.len());
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// True when any indexed file other than `candidate` itself mentions
    /// `base_name` or a non-empty `stem`. First match wins; which file
    /// supplies it is unspecified.
    fn mentions(&self, candidate: &Path, base_name: &str, stem: &str) -> bool {
        self.files.par_iter().any(|file| {
            if file.path.as_path() == candidate {
                return false;
            }
            file.contents.contains(base_name)
                || (!stem.is_empty() && file.contents.contains(stem))
        })
    }
}

fn read_lossy(path: &Path) -> String {
    match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            trace!("Unreadable file {} indexed as empty: {}", path.display(), err);
            String::new()
        }
    }
}

/// Classifies batches of candidates against the content index.
pub struct ReferenceScanner<'a> {
    index: &'a ContentIndex,
    overrides: &'a OverrideStore,
}

impl<'a> ReferenceScanner<'a> {
    pub fn new(index: &'a ContentIndex, overrides: &'a OverrideStore) -> Self {
        Self { index, overrides }
    }

    /// Return the unused subset of `batch`.
    ///
    /// Candidates pinned used are skipped outright; candidates pinned
    /// unused are reported without scanning. When `cancel` trips, the
    /// remaining unchecked candidates are omitted from the result rather
    /// than asserted unused.
    pub fn find_unused(&self, batch: &[CandidateFile], cancel: &CancelFlag) -> Vec<PathBuf> {
        let mut unused = Vec::new();

        for (checked, candidate) in batch.iter().enumerate() {
            if cancel.is_cancelled() {
                debug!(
                    "Cancelled with {} of {} candidates unchecked",
                    batch.len() - checked,
                    batch.len()
                );
                break;
            }

            match self.overrides.status(&candidate.path) {
                Some(true) => continue,
                Some(false) => {
                    unused.push(candidate.path.clone());
                    continue;
                }
                None => {}
            }

            if !self
                .index
                .mentions(&candidate.path, &candidate.base_name, &candidate.stem)
            {
                trace!("No references to {}", candidate.path.display());
                unused.push(candidate.path.clone());
            }
        }

        unused
    }
}
