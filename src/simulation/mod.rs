pub mod parallel;
pub mod streak;

pub use parallel::simulate_streaks_parallel;
pub use streak::{
    crash_point, simulate_counts, simulate_streaks, simulate_streaks_with, StreakCounts,
    StreakReport, UniformSource, STREAK_THRESHOLDS,
};
