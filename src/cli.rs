// src/cli.rs
use crate::config::AnalyzerConfig;
use crate::patterns::scan_sequence;
use crate::report::{export_json, print_patterns, print_scan_result, print_streak_report};
use crate::simulation::simulate_streaks_parallel;
use crate::source::{FileSource, OutcomeSource};
use crate::utils::{log_to_file, measure_time};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser)]
#[command(name = "crash-streak-analyzer")]
#[command(about = "Crash game pattern scanner and loss-streak simulator", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to crash-analyzer.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan round history for the configured patterns
    Scan {
        /// Round history file (JSON or one multiplier per line)
        #[arg(short, long)]
        input: PathBuf,

        /// The file lists the latest round first
        #[arg(long)]
        newest_first: bool,

        /// Look-ahead window after each match
        #[arg(short, long)]
        window: Option<usize>,

        /// Recovery threshold, compared exactly
        #[arg(short, long)]
        threshold: Option<f64>,

        /// List every match under its outcome
        #[arg(long)]
        show_matches: bool,

        /// Export results to JSON file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Estimate consecutive-loss probabilities by simulation
    Simulate {
        /// Loss draws to consume
        #[arg(short = 'n', long)]
        trials: Option<u64>,

        /// Outcomes below this value are losses
        #[arg(short, long)]
        loss_threshold: Option<f64>,

        /// Seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel batches (defaults to 4 with a seed, else the number of CPUs)
        #[arg(short, long)]
        batches: Option<usize>,

        /// Export results to JSON file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// List the configured patterns
    Patterns,
}

// Append a summary line when a run log is configured; failures only warn
fn record_run(config: &AnalyzerConfig, message: &str) {
    if let Some(path) = &config.run_log {
        if let Err(e) = log_to_file(path, message) {
            warn!("Failed to write run log {}: {}", path.display(), e);
        }
    }
}

/// Execute a command from the CLI
pub fn execute_command(cli: Cli) -> Result<()> {
    let config = AnalyzerConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Scan { input, newest_first, window, threshold, show_matches, export } => {
            let lookahead = window.unwrap_or(config.lookahead_window);
            let recovery = threshold.unwrap_or(config.recovery_threshold);

            let sequence = FileSource::new(&input, newest_first)
                .load()
                .with_context(|| format!("Failed to load rounds from {}", input.display()))?;

            let result = measure_time("scan", || {
                scan_sequence(sequence.as_slice(), &config.patterns, lookahead, recovery)
            })?;

            print_scan_result(&result, sequence.len(), show_matches);

            if let Some(export_path) = export {
                export_json(&export_path, "scan", &result)?;
                println!("\nResults exported successfully.");
            }

            record_run(
                &config,
                &format!(
                    "scan {} rounds={} matches={}",
                    input.display(),
                    sequence.len(),
                    result.total_matches()
                ),
            );
        },

        Commands::Simulate { trials, loss_threshold, seed, batches, export } => {
            let trials = trials.unwrap_or(config.simulation_trials);
            let loss_threshold = loss_threshold.unwrap_or(config.loss_threshold);
            let seed = seed.or(config.seed);
            let batches = batches.unwrap_or_else(|| config.batches_for(seed));

            let report = measure_time("simulate", || {
                simulate_streaks_parallel(trials, loss_threshold, batches, seed)
            })?;

            print_streak_report(&report);

            if let Some(export_path) = export {
                export_json(&export_path, "simulation", &report)?;
                println!("\nResults exported successfully.");
            }

            record_run(
                &config,
                &format!("simulate trials={} threshold={} percentages={:?}", trials, loss_threshold, report.percentages),
            );
        },

        Commands::Patterns => {
            print_patterns(&config.patterns);
        },
    }

    Ok(())
}
