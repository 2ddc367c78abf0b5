//! Monte Carlo estimate of consecutive-loss streak probabilities.
//!
//! Crash points are drawn with the inverse CDF `1 / (1 - u)` for a uniform
//! `u` in `[0, 1)`, giving support `[1, inf)`. Draws below the loss threshold
//! extend the running streak; the first draw at or above it closes the streak.

use crate::error::{AnalyzerError, AnalyzerResult};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Streak lengths reported by the simulator.
pub const STREAK_THRESHOLDS: [u32; 4] = [2, 3, 4, 5];

/// Source of uniform samples in `[0, 1)`.
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

impl UniformSource for ChaCha8Rng {
    fn next_uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Inverse-CDF crash point for a uniform sample.
pub fn crash_point(u: f64) -> AnalyzerResult<f64> {
    if !(0.0..1.0).contains(&u) {
        return Err(AnalyzerError::invalid(format!(
            "uniform sample {} is outside [0, 1)",
            u
        )));
    }
    Ok(1.0 / (1.0 - u))
}

/// Raw tallies from one or more simulation batches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakCounts {
    /// Streaks reaching each of `STREAK_THRESHOLDS`, in the same order.
    pub buckets: [u64; 4],
    /// Streaks observed, including zero-length ones.
    pub total_sequences: u64,
    /// Loss draws consumed; this is the budget counter.
    pub loss_draws: u64,
    /// Every draw taken, losses and streak-ending wins.
    pub total_draws: u64,
}

impl StreakCounts {
    pub fn record_streak(&mut self, streak: u64) {
        for (bucket, &threshold) in self.buckets.iter_mut().zip(STREAK_THRESHOLDS.iter()) {
            if streak >= u64::from(threshold) {
                *bucket += 1;
            }
        }
        self.total_sequences += 1;
    }

    pub fn merge(&mut self, other: &StreakCounts) {
        for (a, b) in self.buckets.iter_mut().zip(other.buckets.iter()) {
            *a += b;
        }
        self.total_sequences += other.total_sequences;
        self.loss_draws += other.loss_draws;
        self.total_draws += other.total_draws;
    }

    /// Percentage of sequences reaching each threshold, rounded to 2 decimals.
    pub fn percentages(&self) -> BTreeMap<u32, f64> {
        STREAK_THRESHOLDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&threshold, &count)| {
                let pct = if self.total_sequences == 0 {
                    0.0
                } else {
                    count as f64 / self.total_sequences as f64 * 100.0
                };
                (threshold, round2(pct))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakReport {
    pub num_trials: u64,
    pub loss_threshold: f64,
    pub counts: StreakCounts,
    pub percentages: BTreeMap<u32, f64>,
}

impl StreakReport {
    pub fn from_counts(num_trials: u64, loss_threshold: f64, counts: StreakCounts) -> Self {
        let percentages = counts.percentages();
        Self {
            num_trials,
            loss_threshold,
            counts,
            percentages,
        }
    }

    pub fn percentage(&self, threshold: u32) -> Option<f64> {
        self.percentages.get(&threshold).copied()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn validate_simulation(num_trials: u64, loss_threshold: f64) -> AnalyzerResult<()> {
    if num_trials == 0 {
        return Err(AnalyzerError::invalid("number of trials must be positive"));
    }
    // Every crash point is >= 1, so a threshold at or below 1 never yields a loss
    if !loss_threshold.is_finite() || loss_threshold <= 1.0 {
        return Err(AnalyzerError::invalid(format!(
            "loss threshold must be finite and above 1.0, got {}",
            loss_threshold
        )));
    }
    Ok(())
}

/// Run the streak loop until `num_trials` loss draws have been consumed.
///
/// A winning draw closes the current streak without spending budget. When the
/// budget runs out mid-streak the partial streak is still scored.
pub fn simulate_counts<S: UniformSource + ?Sized>(
    source: &mut S,
    num_trials: u64,
    loss_threshold: f64,
) -> AnalyzerResult<StreakCounts> {
    validate_simulation(num_trials, loss_threshold)?;

    let mut counts = StreakCounts::default();

    while counts.loss_draws < num_trials {
        let mut streak = 0u64;
        loop {
            let crash = crash_point(source.next_uniform())?;
            counts.total_draws += 1;
            if crash >= loss_threshold {
                break;
            }
            streak += 1;
            counts.loss_draws += 1;
            if counts.loss_draws >= num_trials {
                break;
            }
        }
        counts.record_streak(streak);
    }

    Ok(counts)
}

pub fn simulate_streaks_with<S: UniformSource + ?Sized>(
    source: &mut S,
    num_trials: u64,
    loss_threshold: f64,
) -> AnalyzerResult<StreakReport> {
    let counts = simulate_counts(source, num_trials, loss_threshold)?;
    debug!(
        "Simulated {} sequences over {} draws",
        counts.total_sequences, counts.total_draws
    );
    Ok(StreakReport::from_counts(num_trials, loss_threshold, counts))
}

pub(crate) fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Simulate with a ChaCha8 generator, seeded when `seed` is given.
pub fn simulate_streaks(
    num_trials: u64,
    loss_threshold: f64,
    seed: Option<u64>,
) -> AnalyzerResult<StreakReport> {
    let mut rng = make_rng(seed);
    simulate_streaks_with(&mut rng, num_trials, loss_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    // Replays a fixed list of uniform samples.
    struct ScriptedDraws(VecDeque<f64>);

    impl ScriptedDraws {
        fn new(draws: &[f64]) -> Self {
            Self(draws.iter().copied().collect())
        }
    }

    impl UniformSource for ScriptedDraws {
        fn next_uniform(&mut self) -> f64 {
            self.0.pop_front().expect("scripted draws exhausted")
        }
    }

    // 0.0 -> crash 1.00 (loss), 0.5 -> crash 2.00 (win)
    const LOSS: f64 = 0.0;
    const WIN: f64 = 0.5;

    #[test]
    fn crash_point_inverse_cdf() {
        assert_eq!(crash_point(0.0).unwrap(), 1.0);
        assert_eq!(crash_point(0.5).unwrap(), 2.0);
        assert!(crash_point(1.0).is_err());
        assert!(crash_point(-0.1).is_err());
        assert!(crash_point(f64::NAN).is_err());
    }

    #[test]
    fn zero_trials_is_invalid_input() {
        let err = simulate_streaks(0, 1.05, Some(1)).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn threshold_at_or_below_one_is_invalid() {
        assert!(simulate_streaks(10, 1.0, Some(1)).is_err());
        assert!(simulate_streaks(10, f64::NAN, Some(1)).is_err());
    }

    #[test]
    fn budget_exhaustion_scores_partial_streak() {
        // streak of 2 closed by a win, then a partial streak of 1 ends the budget
        let mut draws = ScriptedDraws::new(&[LOSS, LOSS, WIN, LOSS]);
        let report = simulate_streaks_with(&mut draws, 3, 1.05).unwrap();

        assert_eq!(report.counts.total_sequences, 2);
        assert_eq!(report.counts.loss_draws, 3);
        assert_eq!(report.counts.total_draws, 4);
        assert_eq!(report.counts.buckets, [1, 0, 0, 0]);
        assert_eq!(report.percentage(2), Some(50.0));
        assert_eq!(report.percentage(3), Some(0.0));
        assert!(draws.0.is_empty());
    }

    #[test]
    fn single_streak_consuming_whole_budget() {
        let mut draws = ScriptedDraws::new(&[LOSS; 5]);
        let report = simulate_streaks_with(&mut draws, 5, 1.05).unwrap();

        assert_eq!(report.counts.total_sequences, 1);
        for t in STREAK_THRESHOLDS {
            assert_eq!(report.percentage(t), Some(100.0));
        }
    }

    #[test]
    fn wins_do_not_spend_budget_but_count_as_sequences() {
        let mut draws = ScriptedDraws::new(&[WIN, WIN, LOSS]);
        let report = simulate_streaks_with(&mut draws, 1, 1.05).unwrap();

        assert_eq!(report.counts.total_sequences, 3);
        assert_eq!(report.counts.loss_draws, 1);
        assert_eq!(report.counts.buckets, [0, 0, 0, 0]);
    }

    #[test]
    fn percentages_round_to_two_decimals() {
        // three sequences, one reaching 2 -> 33.33%
        let mut draws = ScriptedDraws::new(&[WIN, WIN, LOSS, LOSS]);
        let report = simulate_streaks_with(&mut draws, 2, 1.05).unwrap();
        assert_eq!(report.counts.total_sequences, 3);
        assert_eq!(report.percentage(2), Some(33.33));
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let a = simulate_streaks(5_000, 1.05, Some(42)).unwrap();
        let b = simulate_streaks(5_000, 1.05, Some(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn percentages_are_monotonic() {
        let report = simulate_streaks(20_000, 1.05, Some(7)).unwrap();
        let p: Vec<f64> = STREAK_THRESHOLDS.iter().map(|t| report.percentages[t]).collect();
        assert!(p[0] >= p[1] && p[1] >= p[2] && p[2] >= p[3]);
        assert!(p[0] > 0.0);
    }

    #[test]
    fn merge_sums_tallies() {
        let mut a = StreakCounts::default();
        a.record_streak(3);
        let mut b = StreakCounts::default();
        b.record_streak(0);
        b.record_streak(5);
        a.merge(&b);
        assert_eq!(a.total_sequences, 3);
        assert_eq!(a.buckets, [2, 2, 1, 1]);
    }
}
