// Outcomes below this value are losses
pub const LOSS_THRESHOLD: f64 = 1.05;

// Look-ahead span examined after each pattern match
pub const LOOKAHEAD_WINDOW: usize = 140;

// Helper predicates for pattern windows
pub fn all_below(window: &[f64], value: f64) -> bool {
    window.iter().all(|&x| x < value)
}

#[allow(clippy::float_cmp)]
pub fn all_equal(window: &[f64], value: f64) -> bool {
    window.iter().all(|&x| x == value)
}

pub fn all_at_least(window: &[f64], value: f64) -> bool {
    window.iter().all(|&x| x >= value)
}

// Exact comparison, no tolerance
#[allow(clippy::float_cmp)]
pub fn contains_exact(window: &[f64], value: f64) -> bool {
    window.iter().any(|&x| x == value)
}

pub fn any_below(window: &[f64], value: f64) -> bool {
    window.iter().any(|&x| x < value)
}

// Slice [start, start + len) clamped to the end of the sequence
pub fn bounded_window(sequence: &[f64], start: usize, len: usize) -> &[f64] {
    if start >= sequence.len() {
        return &[];
    }
    let end = start.saturating_add(len).min(sequence.len());
    &sequence[start..end]
}
