use crate::error::{AnalyzerError, AnalyzerResult};
use crate::simulation::streak::{make_rng, simulate_counts, validate_simulation, StreakCounts, StreakReport};
use rayon::prelude::*;
use tracing::{debug, info};

// Split `total` into at most `total` budgets that differ by at most one
fn split_budget(total: u64, parts: usize) -> Vec<u64> {
    let parts_u64 = (parts as u64).min(total);
    if parts_u64 == 0 {
        return Vec::new();
    }
    let base = total / parts_u64;
    let remainder = total % parts_u64;
    (0..parts_u64)
        .map(|i| base + u64::from(i < remainder))
        .filter(|&budget| budget > 0)
        .collect()
}

/// Run independent batches on the rayon pool and pool their tallies.
///
/// Batch `i` is seeded with `seed + i` when a seed is given, so results are
/// reproducible for a fixed `(seed, batches)` pair. Percentages are derived
/// from the pooled totals, not averaged across batches.
pub fn simulate_streaks_parallel(
    num_trials: u64,
    loss_threshold: f64,
    batches: usize,
    seed: Option<u64>,
) -> AnalyzerResult<StreakReport> {
    validate_simulation(num_trials, loss_threshold)?;
    if batches == 0 {
        return Err(AnalyzerError::invalid("batch count must be positive"));
    }

    let budgets = split_budget(num_trials, batches);
    info!(
        "Running {} simulation batches for {} trials (threshold {})",
        budgets.len(),
        num_trials,
        loss_threshold
    );

    let partials: Vec<StreakCounts> = budgets
        .par_iter()
        .enumerate()
        .map(|(i, &budget)| -> AnalyzerResult<StreakCounts> {
            let mut rng = make_rng(seed.map(|s| s.wrapping_add(i as u64)));
            let counts = simulate_counts(&mut rng, budget, loss_threshold)?;
            debug!("Batch {} finished: {} sequences", i, counts.total_sequences);
            Ok(counts)
        })
        .collect::<AnalyzerResult<Vec<_>>>()?;

    let mut pooled = StreakCounts::default();
    for counts in &partials {
        pooled.merge(counts);
    }

    Ok(StreakReport::from_counts(num_trials, loss_threshold, pooled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::streak::simulate_streaks;

    #[test]
    fn split_budget_covers_total() {
        assert_eq!(split_budget(10, 3), vec![4, 3, 3]);
        assert_eq!(split_budget(2, 4), vec![1, 1]);
        assert_eq!(split_budget(8, 1), vec![8]);
        assert_eq!(split_budget(3, usize::MAX), vec![1, 1, 1]);
    }

    #[test]
    fn pooled_loss_draws_match_budget() {
        let report = simulate_streaks_parallel(10_000, 1.05, 4, Some(3)).unwrap();
        assert_eq!(report.counts.loss_draws, 10_000);
        let p = &report.percentages;
        assert!(p[&2] >= p[&3] && p[&3] >= p[&4] && p[&4] >= p[&5]);
    }

    #[test]
    fn seeded_parallel_runs_are_reproducible() {
        let a = simulate_streaks_parallel(4_000, 1.05, 3, Some(11)).unwrap();
        let b = simulate_streaks_parallel(4_000, 1.05, 3, Some(11)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_batch_matches_sequential_run() {
        let parallel = simulate_streaks_parallel(3_000, 1.05, 1, Some(99)).unwrap();
        let sequential = simulate_streaks(3_000, 1.05, Some(99)).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn batch_count_above_budget_is_clamped() {
        let report = simulate_streaks_parallel(10, 1.05, usize::MAX, Some(1)).unwrap();
        assert_eq!(report.counts.loss_draws, 10);
    }

    #[test]
    fn rejects_zero_batches_and_trials() {
        assert!(simulate_streaks_parallel(100, 1.05, 0, None).unwrap_err().is_invalid_input());
        assert!(simulate_streaks_parallel(0, 1.05, 2, None).unwrap_err().is_invalid_input());
    }
}
