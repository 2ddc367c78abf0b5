// Module exports
mod definition;
mod scanner;
pub mod utils;

// Public exports
pub use definition::{builtin_patterns, validate_patterns, PatternDefinition, PatternRule};
pub use scanner::{classify_lookahead, scan_sequence, Classification, PatternMatch, ScanResult};
pub use utils::{LOOKAHEAD_WINDOW, LOSS_THRESHOLD};
