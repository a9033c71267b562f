//! Removal of flagged files, with user confirmation.

use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, MultiSelect};
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Deletes unused files after confirmation.
///
/// Per-file failures are reported and skipped; removal never aborts the
/// whole pass.
pub struct FileRemover {
    interactive: bool,
    dry_run: bool,
}

impl FileRemover {
    pub fn new(interactive: bool, dry_run: bool) -> Self {
        Self {
            interactive,
            dry_run,
        }
    }

    /// Remove `unused` files, returning the paths actually deleted.
    pub fn remove(&self, unused: &[PathBuf], root: &Path) -> Result<Vec<PathBuf>> {
        if unused.is_empty() {
            println!("{}", "No unused files to delete.".green());
            return Ok(Vec::new());
        }

        if self.dry_run {
            println!();
            println!("{}", "Dry run - would delete:".yellow().bold());
            for path in unused {
                println!("  {}", display_relative(path, root));
            }
            println!();
            println!(
                "{}",
                format!("Total: {} files would be deleted", unused.len()).dimmed()
            );
            return Ok(Vec::new());
        }

        let selected = if self.interactive {
            self.interactive_select(unused, root)?
        } else {
            self.batch_confirm(unused)?
        };

        if selected.is_empty() {
            println!("{}", "No files selected for deletion.".yellow());
            return Ok(Vec::new());
        }

        println!();
        println!("{}", "Deleting unused files...".cyan().bold());

        let mut deleted = Vec::new();
        for path in selected {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    println!("  {} Deleted {}", "✓".green(), display_relative(&path, root));
                    debug!("Deleted {}", path.display());
                    deleted.push(path);
                }
                Err(err) => {
                    println!(
                        "  {} Failed to delete {}: {}",
                        "✗".red(),
                        display_relative(&path, root),
                        err
                    );
                }
            }
        }

        Ok(deleted)
    }

    /// Interactive selection mode - pick the files to delete.
    fn interactive_select(&self, unused: &[PathBuf], root: &Path) -> Result<Vec<PathBuf>> {
        let labels: Vec<String> = unused.iter().map(|p| display_relative(p, root)).collect();

        println!();
        println!(
            "{}",
            "Interactive mode - select files to delete:".cyan().bold()
        );

        let picked = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Space to toggle, Enter to confirm")
            .items(&labels)
            .interact()
            .into_diagnostic()?;

        Ok(picked.into_iter().map(|i| unused[i].clone()).collect())
    }

    /// Batch mode - a single confirmation for the whole list.
    fn batch_confirm(&self, unused: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete {} unused files?", unused.len()))
            .default(false)
            .interact()
            .into_diagnostic()?;

        if confirmed {
            Ok(unused.to_vec())
        } else {
            Ok(Vec::new())
        }
    }
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
