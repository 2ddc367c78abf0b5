// Export all necessary modules
pub mod cli;
pub mod config;
pub mod error;
pub mod patterns;
pub mod report;
pub mod simulation;
pub mod source;
pub mod utils;

pub use error::{AnalyzerError, AnalyzerResult};
pub use patterns::{scan_sequence, Classification, PatternDefinition, PatternMatch, PatternRule, ScanResult};
pub use simulation::{simulate_streaks, simulate_streaks_parallel, StreakReport};
pub use source::{FileSource, OutcomeSequence, OutcomeSource, SourceError};
