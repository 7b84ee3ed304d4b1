use serde::{Deserialize, Serialize};

use super::domain::Achievement;

/// Tunable weights and cohort sizing for the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Share of the final score carried by peer upvotes.
    pub vote_weight: f64,
    /// Share of the final score carried by manager rubric ratings.
    pub manager_weight: f64,
    /// Rolling recency window, in days, for the "current" leaderboard.
    pub window_days: i64,
    /// Cohort size for the prior-month winner selection.
    pub winner_count: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            vote_weight: 0.4,
            manager_weight: 0.6,
            window_days: 30,
            winner_count: 3,
        }
    }
}

/// Derived score components for one achievement, all on a 0-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Upvotes normalized against the single most-upvoted achievement in
    /// the whole set.
    pub vote_score: f64,
    /// Average manager rubric rescaled from the 1-5 axis onto 0-10; zero
    /// when no manager has rated the achievement.
    pub manager_score: f64,
    /// `vote_score * vote_weight + manager_score * manager_weight`.
    pub weighted: f64,
}

/// An achievement paired with its freshly computed scores. Keeping the
/// derived values off the canonical entity means a stale score can never
/// be read back between recomputes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAchievement {
    pub achievement: Achievement,
    pub breakdown: ScoreBreakdown,
}

impl ScoredAchievement {
    pub fn weighted(&self) -> f64 {
        self.breakdown.weighted
    }
}

/// Scores the full achievement set in one pass.
///
/// The vote component is relative: it normalizes against the current
/// global maximum, so any change to any achievement's upvotes (or to set
/// membership) shifts every vote score. Callers therefore always rescore
/// everything rather than patching single entries.
pub fn score_achievements(
    achievements: &[Achievement],
    config: &ScoringConfig,
) -> Vec<ScoredAchievement> {
    // Floor of 1 keeps the division defined when the set is empty or
    // nobody has been upvoted yet.
    let max_upvotes = achievements
        .iter()
        .map(|achievement| achievement.upvotes)
        .max()
        .unwrap_or(0)
        .max(1);

    achievements
        .iter()
        .map(|achievement| {
            let vote_score = f64::from(achievement.upvotes) / f64::from(max_upvotes) * 10.0;

            let manager_score = match achievement.average_rubric_total() {
                Some(average_total) => {
                    // 4..=20 across four axes -> 1..=5 per axis -> 0..=10.
                    let per_axis = average_total / 4.0;
                    (per_axis - 1.0) / 4.0 * 10.0
                }
                None => 0.0,
            };

            let weighted =
                vote_score * config.vote_weight + manager_score * config.manager_weight;

            ScoredAchievement {
                achievement: achievement.clone(),
                breakdown: ScoreBreakdown {
                    vote_score,
                    manager_score,
                    weighted,
                },
            }
        })
        .collect()
}

/// Descending by weighted score; ties break on ascending id, which tracks
/// submission time, so equal scores rank the earlier submission first.
pub(crate) fn rank_descending(scored: &mut [ScoredAchievement]) {
    scored.sort_by(|a, b| {
        b.breakdown
            .weighted
            .partial_cmp(&a.breakdown.weighted)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.achievement.id.cmp(&b.achievement.id))
    });
}
