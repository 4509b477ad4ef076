//! # datacleanse-cli
//!
//! Command-line interface for the daily phone-number cleaning workflow.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use datacleanse_core::{
    load_workbook, process_workbook, EngineConfig, NormalizeOptions, ScanOptions,
    DEFAULT_HISTORICAL_THRESHOLD, DEFAULT_MIN_DIGITS, DEFAULT_SEPARATORS,
};
use datacleanse_ledger::{FrequencyStore, SqliteStore};
use datacleanse_report::{ReportClient, ReportOptions};
use datacleanse_types::{ProcessingStats, RunPhase};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// datacleanse - dedup a daily workbook against its own rows and history
#[derive(Parser)]
#[command(name = "datacleanse")]
#[command(
    author,
    version,
    about = "Remove duplicate phone numbers and enforce historical frequency limits",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Ledger database path (default: the user data directory)
    #[arg(long, global = true, value_name = "PATH")]
    ledger: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Clean one workbook and emit the cleaned artifact plus statistics
    Process {
        /// Input workbook (.xlsx or .csv)
        file: PathBuf,

        /// Output path (default: cleaned_<input>.xlsx next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Historical frequency cap, pinned for the whole run
        #[arg(long, default_value_t = DEFAULT_HISTORICAL_THRESHOLD)]
        threshold: u64,

        /// Minimum digits for a cell to count as a phone number
        #[arg(long, default_value_t = DEFAULT_MIN_DIGITS)]
        min_digits: usize,

        /// Separator characters tolerated inside numbers
        #[arg(long, default_value = DEFAULT_SEPARATORS)]
        separators: String,

        /// Skip the narrative report call
        #[arg(long)]
        skip_report: bool,
    },

    /// List recent processing runs
    History {
        /// Maximum number of runs to show
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// Irreversibly clear all historical frequency data
    ResetHistory {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .init();
    }

    let ledger_path = match cli.ledger {
        Some(path) => path,
        None => default_ledger_path()?,
    };

    match cli.command {
        Command::Process {
            file,
            output,
            threshold,
            min_digits,
            separators,
            skip_report,
        } => {
            run_process(ProcessArgs {
                file,
                output,
                threshold,
                min_digits,
                separators,
                skip_report,
                ledger_path,
            })
            .await
        }
        Command::History { limit } => run_history(&ledger_path, limit),
        Command::ResetHistory { yes } => run_reset(&ledger_path, yes),
    }
}

fn default_ledger_path() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("datacleanse").join("history.db"))
        .context("Could not determine the user data directory; pass --ledger")
}

struct ProcessArgs {
    file: PathBuf,
    output: Option<PathBuf>,
    threshold: u64,
    min_digits: usize,
    separators: String,
    skip_report: bool,
    ledger_path: PathBuf,
}

async fn run_process(args: ProcessArgs) -> Result<()> {
    let mut phase = RunPhase::Idle;
    let result = process_inner(&args, &mut phase).await;
    if result.is_err() && phase.is_active() {
        phase
            .advance_to(RunPhase::Error)
            .context("phase bookkeeping")?;
    }
    result
}

async fn process_inner(args: &ProcessArgs, phase: &mut RunPhase) -> Result<()> {
    phase.advance_to(RunPhase::Processing)?;

    let input_name = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("workbook.xlsx")
        .to_string();

    println!("{}", "Reading workbook...".dimmed());
    let book = load_workbook(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let config = EngineConfig {
        historical_threshold: args.threshold,
        scan: ScanOptions::new(args.min_digits, &args.separators)?,
        normalize: NormalizeOptions::default().with_min_digits(args.min_digits),
    };

    println!("{}", "Removing duplicates...".dimmed());
    let mut store = SqliteStore::open(&args.ledger_path)
        .with_context(|| format!("Failed to open ledger at {}", args.ledger_path.display()))?;
    let output = process_workbook(&book, &input_name, &mut store, &config)?;

    let out_path = match &args.output {
        Some(path) => path.clone(),
        None => args
            .file
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&output.stats.processed_file_name),
    };
    output
        .cleaned
        .save(&out_path)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    store
        .record_run(&input_name, &output.stats)
        .context("Failed to record the run in history")?;

    print_stats(&output.stats);
    println!(
        "\n{} {}",
        "Cleaned file written to".green(),
        out_path.display().to_string().green().bold()
    );

    phase.advance_to(RunPhase::Analyzing)?;
    if args.skip_report {
        println!("{}", "Narrative report skipped.".dimmed());
    } else {
        print_narrative(&output.stats).await;
    }

    phase.advance_to(RunPhase::Completed)?;
    Ok(())
}

/// Request the narrative report. Failures degrade to a notice: the
/// cleaned file and statistics above stay valid either way.
async fn print_narrative(stats: &ProcessingStats) {
    let Ok(api_key) = std::env::var("GEMINI_API_KEY") else {
        println!(
            "{}",
            "Narrative report unavailable (set GEMINI_API_KEY to enable it).".dimmed()
        );
        return;
    };

    println!("{}", "Generating analysis report...".dimmed());
    let report = match ReportClient::new(ReportOptions::new(api_key)) {
        Ok(client) => client.generate_report(stats).await,
        Err(e) => Err(e),
    };
    match report {
        Ok(text) => {
            println!("\n{}", "Analysis".bold());
            println!("{text}");
        }
        Err(e) => {
            warn!(error = %e, "narrative report failed");
            println!(
                "{}",
                format!("Narrative report unavailable ({e}); results above are complete.").yellow()
            );
        }
    }
}

fn print_stats(stats: &ProcessingStats) {
    println!("\n{}", "Processing Statistics".bold());
    println!(
        "  {:<26} {}",
        "Total numbers found:",
        stats.total_numbers.to_string().cyan()
    );
    println!(
        "  {:<26} {}  {}",
        "Intra-sheet removed:",
        stats.intra_sheet_duplicates.to_string().yellow(),
        "(same-sheet duplicates)".dimmed()
    );
    println!(
        "  {:<26} {}  {}",
        "History limit removed:",
        stats.historical_duplicates.to_string().red(),
        "(exceeded frequency cap)".dimmed()
    );
    println!(
        "  {:<26} {}  {}",
        "Valid numbers kept:",
        stats.valid_numbers.to_string().green(),
        format!("({:.1}% yield)", stats.yield_percent()).dimmed()
    );
    println!(
        "  {:<26} {} ms",
        "Processing time:",
        stats.processing_time_ms
    );
}

fn run_history(ledger_path: &Path, limit: u32) -> Result<()> {
    let store = SqliteStore::open(ledger_path)
        .with_context(|| format!("Failed to open ledger at {}", ledger_path.display()))?;
    let runs = store.recent_runs(limit)?;

    if runs.is_empty() {
        println!("No processing runs recorded yet.");
        return Ok(());
    }

    println!("{}", "Recent runs".bold());
    for run in runs {
        println!(
            "  {}  {}  kept {}/{} ({} intra-sheet, {} history-capped)",
            run.date.dimmed(),
            run.file_name.cyan(),
            run.stats.valid_numbers,
            run.stats.total_numbers,
            run.stats.intra_sheet_duplicates,
            run.stats.historical_duplicates,
        );
    }
    println!(
        "\nTracked numbers in the ledger: {}",
        store.entry_count()?.to_string().bold()
    );
    Ok(())
}

fn run_reset(ledger_path: &Path, yes: bool) -> Result<()> {
    if !yes {
        print!(
            "{} ",
            "This clears all historical phone-number frequency data and cannot be undone. Type 'yes' to continue:"
                .red()
                .bold()
        );
        std::io::stdout().flush()?;

        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if answer.trim() != "yes" {
            println!("Aborted; nothing was changed.");
            return Ok(());
        }
    }

    let mut store = SqliteStore::open(ledger_path)
        .with_context(|| format!("Failed to open ledger at {}", ledger_path.display()))?;
    store.reset_all()?;
    println!("{}", "Historical data cleared.".green());
    Ok(())
}
