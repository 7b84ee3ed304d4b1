use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::badges::compute_badges;
use super::domain::{avatar_for_name, Achievement, Badge, UserEmail, UserProfile};
use super::scoring::{score_achievements, ScoredAchievement, ScoringConfig};
use super::window::{monthly_winners, ranked_active_window, MonthlyCohort};

/// One immutable pass over the canonical data: every derived value the
/// application presents, recomputed together from a single snapshot of
/// achievements and users.
///
/// There is no incremental path. Any mutation re-runs the whole pipeline,
/// which keeps the relative vote normalization and the badge sets
/// consistent by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardSnapshot {
    /// Every achievement with fresh scores, input order preserved.
    pub scored: Vec<ScoredAchievement>,
    /// Rolling-window board, ranked descending by weighted score.
    pub active: Vec<ScoredAchievement>,
    /// Prior calendar month's top cohort.
    pub cohort: MonthlyCohort,
    /// Per-user derived badge sets; one entry per registered user.
    pub badges: BTreeMap<UserEmail, BTreeSet<Badge>>,
}

impl LeaderboardSnapshot {
    pub fn compute(
        achievements: &[Achievement],
        users: &BTreeMap<UserEmail, UserProfile>,
        now: DateTime<Utc>,
        config: &ScoringConfig,
    ) -> Self {
        let scored = score_achievements(achievements, config);
        let active = ranked_active_window(&scored, now, config);
        let cohort = monthly_winners(&scored, now, config);
        let badges = compute_badges(users, achievements, &cohort.winners);

        Self {
            scored,
            active,
            cohort,
            badges,
        }
    }

    pub fn badges_for(&self, email: &UserEmail) -> BTreeSet<Badge> {
        self.badges.get(email).cloned().unwrap_or_default()
    }

    /// Winner views in rank order, with names and avatars resolved
    /// against the user directory at read time.
    pub fn winner_views(&self, users: &BTreeMap<UserEmail, UserProfile>) -> Vec<WinnerView> {
        self.cohort
            .winners
            .iter()
            .enumerate()
            .map(|(index, entry)| WinnerView::resolve(index + 1, entry, users, &self.badges))
            .collect()
    }

    /// Ranked board entries for display.
    pub fn board_views(&self, users: &BTreeMap<UserEmail, UserProfile>) -> Vec<BoardEntryView> {
        self.active
            .iter()
            .enumerate()
            .map(|(index, entry)| BoardEntryView::resolve(index + 1, entry, users))
            .collect()
    }
}

fn display_name(users: &BTreeMap<UserEmail, UserProfile>, email: &UserEmail) -> String {
    users
        .get(email)
        .map(|profile| profile.name.clone())
        .unwrap_or_else(|| email.to_string())
}

/// A winner resolved for presentation: rank, current display name, avatar,
/// and the author's badge set as of this pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinnerView {
    pub rank: usize,
    pub author_email: UserEmail,
    pub author_name: String,
    pub avatar_url: String,
    pub title: String,
    pub category: &'static str,
    pub upvotes: u32,
    pub weighted_score: f64,
    pub badges: Vec<&'static str>,
}

impl WinnerView {
    fn resolve(
        rank: usize,
        entry: &ScoredAchievement,
        users: &BTreeMap<UserEmail, UserProfile>,
        badges: &BTreeMap<UserEmail, BTreeSet<Badge>>,
    ) -> Self {
        let author = &entry.achievement.author;
        let name = display_name(users, author);
        let badge_labels = badges
            .get(author)
            .map(|set| set.iter().map(|badge| badge.label()).collect())
            .unwrap_or_default();

        Self {
            rank,
            author_email: author.clone(),
            avatar_url: avatar_for_name(&name).to_string(),
            author_name: name,
            title: entry.achievement.title.clone(),
            category: entry.achievement.category.label(),
            upvotes: entry.achievement.upvotes,
            weighted_score: entry.breakdown.weighted,
            badges: badge_labels,
        }
    }
}

/// One row of the active leaderboard, resolved for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardEntryView {
    pub rank: usize,
    pub achievement_id: i64,
    pub author_name: String,
    pub avatar_url: String,
    pub title: String,
    pub category: &'static str,
    pub upvotes: u32,
    pub vote_score: f64,
    pub manager_score: f64,
    pub weighted_score: f64,
}

impl BoardEntryView {
    fn resolve(
        rank: usize,
        entry: &ScoredAchievement,
        users: &BTreeMap<UserEmail, UserProfile>,
    ) -> Self {
        let name = display_name(users, &entry.achievement.author);
        Self {
            rank,
            achievement_id: entry.achievement.id.0,
            avatar_url: avatar_for_name(&name).to_string(),
            author_name: name,
            title: entry.achievement.title.clone(),
            category: entry.achievement.category.label(),
            upvotes: entry.achievement.upvotes,
            vote_score: entry.breakdown.vote_score,
            manager_score: entry.breakdown.manager_score,
            weighted_score: entry.breakdown.weighted,
        }
    }
}
