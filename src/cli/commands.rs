//! Command implementations for the extractor CLI
//!
//! Contains the command execution logic, progress reporting, and the
//! worker fan-out that feeds documents through the orchestrator.

use crate::app::adapters::filesystem;
use crate::app::services::orchestrator::{Orchestrator, RunStats};
use crate::cli::args::{Args, Commands, ExtractArgs, StationsArgs};
use crate::config::Config;
use crate::constants::DEFAULT_TARGET_STATIONS;
use crate::{Error, Result};
use colored::Colorize;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Main command runner, dispatching to the subcommand handlers
pub async fn run(args: Args, cancel: CancellationToken) -> Result<RunStats> {
    match args.command {
        Some(Commands::Extract(extract_args)) => run_extract(extract_args, cancel).await,
        Some(Commands::Stations(stations_args)) => run_stations(stations_args),
        None => {
            // Bare invocation behaves like `extract` with defaults
            run_extract(ExtractArgs::parse_from_defaults(), cancel).await
        }
    }
}

impl ExtractArgs {
    fn parse_from_defaults() -> Self {
        use clap::Parser;
        Self::parse_from(["extract"])
    }
}

/// Run the extraction pipeline over every discovered document
pub async fn run_extract(args: ExtractArgs, cancel: CancellationToken) -> Result<RunStats> {
    setup_logging(&args)?;
    let config = args.to_config()?;

    let documents = filesystem::discover_documents(&config.input_dir)?;
    if documents.is_empty() {
        return Err(Error::input_discovery(
            format!("no .txt documents under {}", config.input_dir.display()),
            None,
        ));
    }

    println!(
        "{} {} documents, {} target stations, {} workers",
        "Starting yearbook extraction:".bright_green().bold(),
        documents.len().to_string().bright_white().bold(),
        config.target_stations.len().to_string().bright_white().bold(),
        config.workers.to_string().bright_white().bold()
    );

    let orchestrator = Arc::new(Orchestrator::new(&config, cancel.clone())?);
    let progress = document_progress(documents.len(), config.show_progress);

    let mut results = stream::iter(documents)
        .map(|path| {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::task::spawn_blocking(move || process_one_document(&orchestrator, path))
        })
        .buffer_unordered(config.workers);

    let mut totals = RunStats::new();
    while let Some(joined) = results.next().await {
        let result = joined
            .map_err(|e| Error::processing_interrupted(format!("worker task failed: {e}")))?;
        progress.inc(1);
        match result {
            Ok(stats) => totals.merge(&stats),
            Err(error @ Error::ProcessingInterrupted { .. }) => {
                progress.abandon_with_message("cancelled");
                orchestrator.flush()?;
                return Err(error);
            }
            // One unreadable document must not sink the run
            Err(error) => {
                warn!(%error, "document skipped");
                totals.page_errors += 1;
            }
        }
    }

    progress.finish_and_clear();
    orchestrator.flush()?;
    report_summary(&totals, &config);
    Ok(totals)
}

fn process_one_document(orchestrator: &Orchestrator, path: PathBuf) -> Result<RunStats> {
    let document = filesystem::load_document(&path)?;
    info!(document = %document.name, pages = document.pages.len(), "processing document");
    orchestrator.process_document(&document)
}

/// List the target stations without touching any input
pub fn run_stations(args: StationsArgs) -> Result<RunStats> {
    let codes: Vec<String> = match args.stations {
        Some(list) => list.0,
        None => DEFAULT_TARGET_STATIONS.iter().map(|s| s.to_string()).collect(),
    };

    println!("{}", "Target stations".bright_green().bold());
    for code in &codes {
        println!("  {code}");
    }
    println!("{} stations", codes.len().to_string().bright_white().bold());
    Ok(RunStats::new())
}

/// Set up structured logging from the verbosity flags
fn setup_logging(args: &ExtractArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dsi_extractor={}", args.log_level())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();
    Ok(())
}

fn document_progress(total: usize, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    progress
}

fn report_summary(totals: &RunStats, config: &Config) {
    println!("\n{}", "Extraction Summary".bright_green().bold());
    println!("{}", "=".repeat(50));
    println!(
        "  Pages scanned:      {}",
        totals.pages_scanned.to_string().bright_white().bold()
    );
    println!(
        "  Candidate pages:    {}",
        totals.candidates.to_string().bright_white().bold()
    );
    println!(
        "  Records written:    {}",
        totals.finalized.to_string().bright_green().bold()
    );
    println!(
        "  Duplicates skipped: {}",
        totals.duplicates_skipped.to_string().bright_yellow().bold()
    );
    println!(
        "  Partial records:    {}",
        totals.partials.to_string().bright_yellow().bold()
    );
    println!(
        "  Foreign stations:   {}",
        totals.foreign_stations.to_string().bright_white()
    );
    println!(
        "  Page errors:        {}",
        totals.page_errors.to_string().bright_red().bold()
    );
    println!("  Output: {}", config.output_file.display());
    if let Some(review) = &config.review_file {
        println!("  Review: {}", review.display());
    }
}
