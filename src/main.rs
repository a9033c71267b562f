use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use deadfiles::cleanup::FileRemover;
use deadfiles::config::Config;
use deadfiles::engine::CancelFlag;
use deadfiles::overrides::OverrideStore;
use deadfiles::report::{ReportFormat, Reporter};
use deadfiles::scan::{ScanOrchestrator, ScanOutcome, DEFAULT_BATCH_SIZE};
use deadfiles::watch::{FileWatcher, WatchEvent};

/// deadfiles - find files never referenced by the rest of a project tree
#[derive(Parser, Debug)]
#[command(name = "deadfiles")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to a configuration file (default: .deadfiles.json at the root)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Additional file extensions to track (can be specified multiple times)
    #[arg(long)]
    file_type: Vec<String>,

    /// Additional folder names to prune (can be specified multiple times)
    #[arg(long)]
    ignore_folder: Vec<String>,

    /// Additional file names to skip (can be specified multiple times)
    #[arg(long)]
    ignore_root_file: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: OutputFormat,

    /// Output file (for json format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Candidate files classified per batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Delete the flagged files after the scan
    #[arg(long)]
    delete: bool,

    /// Interactive mode for deletions (select each file)
    #[arg(long)]
    interactive: bool,

    /// Dry run - show what would be deleted without making changes
    #[arg(long)]
    dry_run: bool,

    /// Watch mode - continuously monitor for changes
    #[arg(long)]
    watch: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Default)]
enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    info!("deadfiles v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config(&cli)?;

    // Fresh session: overrides never survive a process restart
    let overrides = Arc::new(OverrideStore::new());
    overrides.reset_all();

    let orchestrator = ScanOrchestrator::new(overrides)
        .with_config(config.clone())
        .with_batch_size(cli.batch_size);

    if cli.watch {
        run_watch_mode(&orchestrator, &config, &cli)?;
    } else {
        run_scan(&orchestrator, &cli)?;
    }

    Ok(())
}

fn run_scan(orchestrator: &ScanOrchestrator, cli: &Cli) -> Result<ScanOutcome> {
    let start_time = Instant::now();

    let pb = if cli.quiet { None } else { Some(progress_bar()) };
    let cancel = CancelFlag::new();
    let total_tracked = std::cell::Cell::new(0usize);

    let outcome = orchestrator
        .scan(
            &cli.path,
            |progress| {
                total_tracked.set(progress.total);
                if let Some(pb) = &pb {
                    pb.set_length(progress.total as u64);
                    pb.set_position(progress.processed as u64);
                    pb.set_message(progress.message.clone());
                }
            },
            &cancel,
        )
        .into_diagnostic()?;

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    let root = std::fs::canonicalize(&cli.path).unwrap_or_else(|_| cli.path.clone());

    let reporter = Reporter::new(cli.format.clone().into(), cli.output.clone());
    reporter.report(&outcome, &root)?;

    if cli.delete {
        let remover = FileRemover::new(cli.interactive, cli.dry_run);
        let deleted = remover.remove(&outcome.unused_files, &root)?;
        for path in &deleted {
            orchestrator.on_delete(path);
        }
    }

    let elapsed = start_time.elapsed();
    if !cli.quiet && matches!(cli.format, OutputFormat::Terminal) {
        println!(
            "{}",
            format!(
                "⏱  Scanned {} files in {:.2}s",
                total_tracked.get(),
                elapsed.as_secs_f64()
            )
            .dimmed()
        );
    }

    Ok(outcome)
}

fn run_watch_mode(orchestrator: &ScanOrchestrator, config: &Config, cli: &Cli) -> Result<()> {
    // Initial scan before entering the event loop
    run_scan(orchestrator, cli)?;

    println!();
    println!(
        "{}",
        "👁  Watch mode active. Press Ctrl+C to stop.".cyan().bold()
    );
    println!(
        "{}",
        format!("   Watching: {}", cli.path.display()).dimmed()
    );
    println!();

    let watcher = FileWatcher::new(config.clone());
    watcher
        .watch(&cli.path, |event| match event {
            WatchEvent::Removed(paths) => {
                // Deletions only prune the current result set; no rescan
                for path in &paths {
                    orchestrator.on_delete(path);
                }
                println!(
                    "{}",
                    format!(
                        "🗑  Pruned {} deleted file(s), {} unused files remain",
                        paths.len(),
                        orchestrator.unused_files().len()
                    )
                    .yellow()
                );
                true
            }
            WatchEvent::Changed(paths) => {
                println!();
                println!(
                    "{}",
                    format!("🔄 Changes detected in {} file(s), re-scanning...", paths.len())
                        .yellow()
                );
                match run_scan(orchestrator, cli) {
                    Ok(_) => {
                        println!();
                        println!("{}", "✓ Scan complete. Waiting for changes...".green());
                        true
                    }
                    Err(e) => {
                        eprintln!("{}: {}", "Scan error".red(), e);
                        true // Continue watching
                    }
                }
            }
        })
        .map_err(|e| miette::miette!("Watch error: {}", e))?;

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::resolve(&cli.path)
    };

    // Extend with CLI arguments
    if !cli.file_type.is_empty() {
        config.file_types.extend(cli.file_type.clone());
    }
    if !cli.ignore_folder.is_empty() {
        config.ignore_folders.extend(cli.ignore_folder.clone());
    }
    if !cli.ignore_root_file.is_empty() {
        config.ignore_root_files.extend(cli.ignore_root_file.clone());
    }
    config.normalize();

    Ok(config)
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}
