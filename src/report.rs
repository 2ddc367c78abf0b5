// src/report.rs
use crate::patterns::{Classification, PatternDefinition, ScanResult};
use crate::simulation::StreakReport;
use crate::utils::utils::{format_time, truncate_string};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Envelope written by `--export`
#[derive(Debug, Serialize)]
pub struct ExportedReport<'a, T: Serialize> {
    pub generated_at: DateTime<Utc>,
    pub kind: &'a str,
    pub report: &'a T,
}

pub fn export_json<T: Serialize>(path: &Path, kind: &str, report: &T) -> Result<()> {
    let envelope = ExportedReport {
        generated_at: Utc::now(),
        kind,
        report,
    };
    let json = serde_json::to_string_pretty(&envelope)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}

pub fn print_scan_result(result: &ScanResult, rounds: usize, show_matches: bool) {
    println!("Scanned {} rounds at {}", rounds, format_time(&Utc::now()));
    println!("{:<30} | {:<10}", "Pattern", "Matches");
    println!("{:-<30}-+-{:-<10}", "", "");
    for (name, count) in &result.counts {
        println!("{:<30} | {:<10}", truncate_string(name, 30), count);
    }

    println!("\nOutcomes:");
    for classification in Classification::ALL {
        println!(
            "  {:<22} {}",
            classification.to_string(),
            result.bucket_len(classification)
        );
    }

    if show_matches {
        for classification in Classification::ALL {
            println!("\n[{}]", classification);
            for m in result.bucket(classification) {
                println!("  #{:<8} {}", m.index, m.pattern);
            }
        }
    }
}

pub fn print_patterns(patterns: &[PatternDefinition]) {
    println!("Found {} patterns:", patterns.len());
    println!("{:<30} | {:<6} | {:<20}", "Name", "Length", "Rule");
    println!("{:-<30}-+-{:-<6}-+-{:-<20}", "", "", "");
    for pattern in patterns {
        println!(
            "{:<30} | {:<6} | {:<20}",
            truncate_string(&pattern.name, 30),
            pattern.length,
            pattern.rule.to_string()
        );
    }
}

pub fn print_streak_report(report: &StreakReport) {
    println!(
        "Simulated {} loss draws at threshold {:.2} ({} sequences, {} draws)",
        report.num_trials,
        report.loss_threshold,
        report.counts.total_sequences,
        report.counts.total_draws
    );
    println!("{:<24} | {:<10}", "Consecutive losses", "Percent");
    println!("{:-<24}-+-{:-<10}", "", "");
    for (threshold, pct) in &report.percentages {
        println!("{:<24} | {:.2}%", format!(">= {}", threshold), pct);
    }
}
