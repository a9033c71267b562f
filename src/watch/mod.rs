//! Watch mode.
//!
//! Monitors a project tree and classifies debounced filesystem events into
//! deletions of tracked files (which only prune the current result set)
//! and content changes (which warrant a rescan).

use crate::config::Config;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Watch mode errors
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to create file watcher: {0}")]
    WatcherError(#[from] notify::Error),
    #[error("Failed to receive events: {0}")]
    RecvError(#[from] std::sync::mpsc::RecvError),
}

/// A debounced batch of relevant filesystem activity.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// Tracked files whose content changed or that appeared
    Changed(Vec<PathBuf>),

    /// Tracked files that no longer exist on disk
    Removed(Vec<PathBuf>),
}

/// File watcher delivering [`WatchEvent`]s to a handler.
pub struct FileWatcher {
    /// Debounce duration in milliseconds
    debounce_ms: u64,
    config: Config,
}

impl FileWatcher {
    pub fn new(config: Config) -> Self {
        Self {
            debounce_ms: 500,
            config,
        }
    }

    #[allow(dead_code)] // Builder pattern method for future configuration
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Whether activity on `path` is relevant to the scan.
    fn is_relevant(&self, path: &Path) -> bool {
        if !self.config.is_tracked(path) {
            return false;
        }
        // Events under ignored folders never trigger
        !path.components().any(|c| {
            c.as_os_str()
                .to_str()
                .map(|name| self.config.ignores_folder(name))
                .unwrap_or(false)
        })
    }

    /// Watch `path` and deliver events until the handler returns false.
    pub fn watch<F>(&self, path: &Path, mut on_event: F) -> Result<(), WatchError>
    where
        F: FnMut(WatchEvent) -> bool,
    {
        let (tx, rx) = channel();

        let mut debouncer = new_debouncer(Duration::from_millis(self.debounce_ms), tx)?;
        debouncer.watcher().watch(path, RecursiveMode::Recursive)?;

        debug!("Watching {} for changes", path.display());

        loop {
            match rx.recv() {
                Ok(result) => match result {
                    Ok(events) => {
                        let mut removed = Vec::new();
                        let mut changed = Vec::new();

                        for event in events {
                            if !matches!(
                                event.kind,
                                DebouncedEventKind::Any | DebouncedEventKind::AnyContinuous
                            ) {
                                continue;
                            }
                            if !self.is_relevant(&event.path) {
                                continue;
                            }
                            if event.path.exists() {
                                changed.push(event.path);
                            } else {
                                removed.push(event.path);
                            }
                        }

                        if !removed.is_empty() && !on_event(WatchEvent::Removed(removed)) {
                            break;
                        }
                        if !changed.is_empty() && !on_event(WatchEvent::Changed(changed)) {
                            break;
                        }
                    }
                    Err(err) => {
                        debug!("Watch error: {:?}", err);
                    }
                },
                Err(err) => {
                    return Err(WatchError::RecvError(err));
                }
            }
        }

        Ok(())
    }
}
