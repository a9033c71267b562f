use crate::scan::ScanOutcome;
use colored::Colorize;
use miette::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Terminal reporter with colored output, grouped by directory
pub struct TerminalReporter {
    show_tips: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self { show_tips: true }
    }

    #[allow(dead_code)] // Builder pattern method for future use
    pub fn with_tips(mut self, show: bool) -> Self {
        self.show_tips = show;
        self
    }

    pub fn report(&self, outcome: &ScanOutcome, root: &Path) -> Result<()> {
        if outcome.unused_files.is_empty() {
            if outcome.cancelled {
                println!("{}", "Scan cancelled before any unused files were found.".yellow());
            } else {
                println!("{}", "No unused files found!".green().bold());
            }
            return Ok(());
        }

        // Group by parent directory
        let mut by_dir: BTreeMap<PathBuf, Vec<&PathBuf>> = BTreeMap::new();
        for path in &outcome.unused_files {
            let dir = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            by_dir.entry(dir).or_default().push(path);
        }

        println!();
        let header = if outcome.cancelled {
            format!(
                "Found {} unused files (scan cancelled early):",
                outcome.unused_files.len()
            )
        } else {
            format!("Found {} unused files:", outcome.unused_files.len())
        };
        println!("{}", header.yellow().bold());
        println!();

        for (dir, files) in &by_dir {
            let shown = dir.strip_prefix(root).unwrap_or(dir);
            let label = if shown.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                shown.to_path_buf()
            };
            println!("{}", label.display().to_string().cyan().bold());

            for file in files {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.display().to_string());
                println!("  {} {}", "✗".red(), name.white());
            }
            println!();
        }

        println!("{}", "─".repeat(60).dimmed());
        println!(
            "Summary: {}",
            format!("{} files never referenced", outcome.unused_files.len()).yellow()
        );

        if self.show_tips {
            println!();
            println!(
                "{}",
                "⚠ The reference check is textual; verify before deleting".yellow()
            );
            println!(
                "{}",
                "Tip: Run with --delete to remove them interactively".dimmed()
            );
        }

        Ok(())
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
