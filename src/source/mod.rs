// src/source/mod.rs
mod file;
mod models;

pub use file::FileSource;
pub use models::{OutcomeSequence, RoundRecord};

use thiserror::Error;

/// Failures while acquiring round history.
///
/// Malformed or partial data is always reported as `NoData` so it never
/// reaches the scanner.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("No data available: {0}")]
    NoData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supplies a validated, oldest-first outcome sequence.
pub trait OutcomeSource {
    fn load(&self) -> Result<OutcomeSequence, SourceError>;
}

// Shared validation for every source
pub(crate) fn validate_outcomes(values: Vec<f64>) -> Result<OutcomeSequence, SourceError> {
    if values.is_empty() {
        return Err(SourceError::NoData("source returned no rounds".to_string()));
    }
    if let Some((pos, v)) = values
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v < 1.0)
    {
        return Err(SourceError::NoData(format!(
            "round {} has invalid multiplier {}",
            pos, v
        )));
    }
    Ok(OutcomeSequence::new(values))
}
