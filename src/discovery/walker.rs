use crate::config::Config;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// A tracked file entering classification, with the name parts the
/// reference heuristic matches on. Recomputed per scan; a candidate has no
/// identity beyond its path.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// Absolute path to the file
    pub path: PathBuf,

    /// File name including extension
    pub base_name: String,

    /// File name with the final extension segment removed
    pub stem: String,
}

impl CandidateFile {
    pub fn new(path: PathBuf) -> Self {
        let base_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path,
            base_name,
            stem,
        }
    }
}

/// Recursive project-tree walker.
pub struct TreeWalker<'a> {
    config: &'a Config,
}

impl<'a> TreeWalker<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Enumerate every file under `root` in traversal order.
    ///
    /// Directories whose name matches an ignored folder are pruned at any
    /// depth, and files whose name matches an ignored file name are skipped
    /// at any depth. Unreadable entries are dropped rather than failing
    /// the walk. Symlinks are not followed.
    pub fn walk(&self, root: &Path) -> Vec<PathBuf> {
        debug!("Walking tree at {}", root.display());

        let files: Vec<PathBuf> = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| self.keep(entry))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();

        debug!("Walk found {} files", files.len());
        files
    }

    /// Walk and keep only files with a tracked extension.
    pub fn tracked_files(&self, root: &Path) -> Vec<CandidateFile> {
        self.walk(root)
            .into_iter()
            .filter(|path| self.config.is_tracked(path))
            .map(CandidateFile::new)
            .collect()
    }

    fn keep(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();

        if entry.file_type().is_dir() {
            // Name match, not path match: a nested folder sharing an
            // ignored name is pruned too. The root itself is never pruned.
            if entry.depth() > 0 && self.config.ignores_folder(&name) {
                trace!("Pruning folder {}", entry.path().display());
                return false;
            }
            return true;
        }

        // Ignored file names are skipped at every depth, matching the
        // configured names wherever they appear.
        if self.config.ignores_file_name(&name) {
            trace!("Skipping {}", entry.path().display());
            return false;
        }

        true
    }
}
