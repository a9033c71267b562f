use crate::scan::ScanOutcome;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, outcome: &ScanOutcome) -> Result<()> {
        let report = JsonReport::from_outcome(outcome);
        let json = serde_json::to_string_pretty(&report).into_diagnostic()?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport {
    version: &'static str,
    total_unused: usize,
    cancelled: bool,
    unused_files: Vec<String>,
}

impl JsonReport {
    fn from_outcome(outcome: &ScanOutcome) -> Self {
        Self {
            version: "1.0",
            total_unused: outcome.unused_files.len(),
            cancelled: outcome.cancelled,
            unused_files: outcome
                .unused_files
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        }
    }
}
