// src/patterns/definition.rs
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::patterns::utils::{all_at_least, all_below, all_equal, LOSS_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Predicate applied to every outcome of a pattern window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PatternRule {
    /// Every outcome is strictly below `value`
    #[serde(rename = "all_below")]
    AllBelow { value: f64 },
    /// Every outcome is exactly `value`
    #[serde(rename = "all_equal")]
    AllEqual { value: f64 },
    /// Every outcome is at least `value`
    #[serde(rename = "all_at_least")]
    AllAtLeast { value: f64 },
}

impl PatternRule {
    pub fn value(&self) -> f64 {
        match self {
            PatternRule::AllBelow { value }
            | PatternRule::AllEqual { value }
            | PatternRule::AllAtLeast { value } => *value,
        }
    }

    pub fn holds(&self, window: &[f64]) -> bool {
        match self {
            PatternRule::AllBelow { value } => all_below(window, *value),
            PatternRule::AllEqual { value } => all_equal(window, *value),
            PatternRule::AllAtLeast { value } => all_at_least(window, *value),
        }
    }
}

impl fmt::Display for PatternRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternRule::AllBelow { value } => write!(f, "all < {:.2}", value),
            PatternRule::AllEqual { value } => write!(f, "all == {:.2}", value),
            PatternRule::AllAtLeast { value } => write!(f, "all >= {:.2}", value),
        }
    }
}

/// A named, fixed-length rule matched against contiguous outcomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDefinition {
    /// Name used as the key in scan counts
    pub name: String,
    /// Number of contiguous outcomes the rule covers
    pub length: usize,
    /// Predicate over the window
    pub rule: PatternRule,
}

impl PatternDefinition {
    pub fn new(name: impl Into<String>, length: usize, rule: PatternRule) -> Self {
        Self {
            name: name.into(),
            length,
            rule,
        }
    }

    // A window of the wrong size never matches
    pub fn matches(&self, window: &[f64]) -> bool {
        window.len() == self.length && self.rule.holds(window)
    }
}

// The default pattern table
pub fn builtin_patterns() -> Vec<PatternDefinition> {
    vec![
        PatternDefinition::new("below_1.05_x2", 2, PatternRule::AllBelow { value: LOSS_THRESHOLD }),
        PatternDefinition::new("below_1.05_x3", 3, PatternRule::AllBelow { value: LOSS_THRESHOLD }),
        PatternDefinition::new("below_1.05_x4", 4, PatternRule::AllBelow { value: LOSS_THRESHOLD }),
        PatternDefinition::new("exact_1.00_x2", 2, PatternRule::AllEqual { value: 1.0 }),
        PatternDefinition::new("exact_1.00_x3", 3, PatternRule::AllEqual { value: 1.0 }),
    ]
}

/// Reject pattern sets the scanner cannot key results by.
pub fn validate_patterns(patterns: &[PatternDefinition]) -> AnalyzerResult<()> {
    if patterns.is_empty() {
        return Err(AnalyzerError::invalid("pattern set is empty"));
    }

    let mut names = HashSet::new();
    for pattern in patterns {
        if pattern.name.trim().is_empty() {
            return Err(AnalyzerError::invalid("pattern name is empty"));
        }
        if !names.insert(pattern.name.as_str()) {
            return Err(AnalyzerError::invalid(format!(
                "duplicate pattern name: {}",
                pattern.name
            )));
        }
        if pattern.length == 0 {
            return Err(AnalyzerError::invalid(format!(
                "pattern {} has zero length",
                pattern.name
            )));
        }
        if !pattern.rule.value().is_finite() {
            return Err(AnalyzerError::invalid(format!(
                "pattern {} has a non-finite rule value",
                pattern.name
            )));
        }
    }

    Ok(())
}
