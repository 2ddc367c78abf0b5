use crate::error::{AnalyzerError, AnalyzerResult};
use crate::patterns::definition::{validate_patterns, PatternDefinition};
use crate::patterns::utils::{any_below, bounded_window, contains_exact};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// Aftermath of a pattern match, judged on the look-ahead window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// The threshold value appears, but so does at least one loss.
    Recovered,
    /// The threshold value appears and no outcome falls below it.
    RecoveredThenClean,
    /// The threshold value never appears exactly.
    NoRecovery,
}

impl Classification {
    pub const ALL: [Classification; 3] = [
        Classification::RecoveredThenClean,
        Classification::Recovered,
        Classification::NoRecovery,
    ];
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Recovered => write!(f, "recovered"),
            Classification::RecoveredThenClean => write!(f, "recovered_then_clean"),
            Classification::NoRecovery => write!(f, "no_recovery"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub index: usize,
    pub pattern: String,
    pub classification: Classification,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Matches per pattern name, zero for patterns that never matched
    pub counts: BTreeMap<String, usize>,
    /// Every match, ordered by start index then pattern table order
    pub matches: Vec<PatternMatch>,
}

impl ScanResult {
    pub fn count_for(&self, pattern: &str) -> usize {
        self.counts.get(pattern).copied().unwrap_or(0)
    }

    pub fn total_matches(&self) -> usize {
        self.matches.len()
    }

    pub fn bucket(&self, classification: Classification) -> impl Iterator<Item = &PatternMatch> {
        self.matches
            .iter()
            .filter(move |m| m.classification == classification)
    }

    pub fn bucket_len(&self, classification: Classification) -> usize {
        self.bucket(classification).count()
    }
}

/// Classify a look-ahead window.
///
/// Recovery is detected by exact equality with `recovery_threshold`; a window
/// holding only values strictly above the threshold is `NoRecovery`.
pub fn classify_lookahead(window: &[f64], recovery_threshold: f64) -> Classification {
    if !contains_exact(window, recovery_threshold) {
        return Classification::NoRecovery;
    }
    if any_below(window, recovery_threshold) {
        Classification::Recovered
    } else {
        Classification::RecoveredThenClean
    }
}

/// Scan `sequence` for every pattern at every start index and classify each match.
///
/// Overlapping matches are all reported; one index may match several patterns.
/// Look-ahead windows near the end of the sequence are simply shorter.
pub fn scan_sequence(
    sequence: &[f64],
    patterns: &[PatternDefinition],
    lookahead_window: usize,
    recovery_threshold: f64,
) -> AnalyzerResult<ScanResult> {
    validate_patterns(patterns)?;

    if !recovery_threshold.is_finite() {
        return Err(AnalyzerError::invalid("recovery threshold must be finite"));
    }
    if let Some(pos) = sequence.iter().position(|v| !v.is_finite()) {
        return Err(AnalyzerError::invalid(format!(
            "outcome at index {} is not finite",
            pos
        )));
    }

    debug!(
        "Scanning {} outcomes against {} patterns (window {}, threshold {})",
        sequence.len(),
        patterns.len(),
        lookahead_window,
        recovery_threshold
    );

    let mut result = ScanResult {
        counts: patterns.iter().map(|p| (p.name.clone(), 0)).collect(),
        matches: Vec::new(),
    };

    for i in 0..sequence.len() {
        for pattern in patterns {
            let end = match i.checked_add(pattern.length) {
                Some(end) if end <= sequence.len() => end,
                _ => continue,
            };
            if !pattern.matches(&sequence[i..end]) {
                continue;
            }

            let future = bounded_window(sequence, end, lookahead_window);
            let classification = classify_lookahead(future, recovery_threshold);

            if let Some(count) = result.counts.get_mut(&pattern.name) {
                *count += 1;
            }
            result.matches.push(PatternMatch {
                index: i,
                pattern: pattern.name.clone(),
                classification,
            });
        }
    }

    info!(
        "Scan complete: {} matches ({} clean, {} recovered, {} no recovery)",
        result.total_matches(),
        result.bucket_len(Classification::RecoveredThenClean),
        result.bucket_len(Classification::Recovered),
        result.bucket_len(Classification::NoRecovery)
    );

    Ok(result)
}
