use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::scoring::{rank_descending, ScoredAchievement, ScoringConfig};

/// Winners of the calendar month immediately preceding `now`, plus the
/// display label for that month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCohort {
    pub winners: Vec<ScoredAchievement>,
    pub month_label: String,
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Achievements created inside the rolling recency window ending at `now`.
///
/// This is deliberately a fixed 30-day window rather than a calendar
/// month: the "what's hot now" board and the "who won last month" cohort
/// answer different questions and may disagree near month boundaries.
pub fn active_window(
    scored: &[ScoredAchievement],
    now: DateTime<Utc>,
    config: &ScoringConfig,
) -> Vec<ScoredAchievement> {
    let cutoff = now - Duration::days(config.window_days);
    scored
        .iter()
        .filter(|entry| entry.achievement.created_at >= cutoff)
        .cloned()
        .collect()
}

/// Same as [`active_window`] but ranked for display.
pub fn ranked_active_window(
    scored: &[ScoredAchievement],
    now: DateTime<Utc>,
    config: &ScoringConfig,
) -> Vec<ScoredAchievement> {
    let mut active = active_window(scored, now, config);
    rank_descending(&mut active);
    active
}

/// Year and month of the calendar month before `now`, with the year
/// rolling back across a January boundary.
fn prior_month(now: DateTime<Utc>) -> (i32, u32) {
    match now.month() {
        1 => (now.year() - 1, 12),
        month => (now.year(), month - 1),
    }
}

/// Top achievements of the immediately preceding calendar month.
///
/// Filters by exact year and month match on the creation timestamp, ranks
/// descending by weighted score (ties go to the earlier submission by id),
/// and keeps at most `config.winner_count` entries. Total over any input:
/// an empty or out-of-month set yields an empty cohort, never an error.
pub fn monthly_winners(
    scored: &[ScoredAchievement],
    now: DateTime<Utc>,
    config: &ScoringConfig,
) -> MonthlyCohort {
    let (year, month) = prior_month(now);

    let mut winners: Vec<ScoredAchievement> = scored
        .iter()
        .filter(|entry| {
            let created = entry.achievement.created_at;
            created.year() == year && created.month() == month
        })
        .cloned()
        .collect();

    rank_descending(&mut winners);
    winners.truncate(config.winner_count);

    MonthlyCohort {
        winners,
        month_label: MONTH_NAMES[(month - 1) as usize].to_string(),
    }
}
