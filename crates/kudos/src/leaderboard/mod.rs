//! Recognition leaderboard engine: scoring, windowing, winner selection,
//! and badge derivation, plus the orchestration service that re-runs the
//! whole pipeline after every mutation.

pub mod announce;
pub mod badges;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod snapshot;
pub mod window;

#[cfg(test)]
mod tests;

pub use announce::{
    social_post, winner_email, Announcement, AnnouncementChannel, AnnouncementPublisher,
    PublishError,
};
pub use badges::{compute_badges, HUNDRED_UPVOTES_THRESHOLD};
pub use domain::{
    avatar_for_name, Achievement, AchievementCategory, AchievementId, Badge, Role, RubricError,
    RubricScore, UserEmail, UserProfile,
};
pub use repository::{AchievementStore, DirectoryError, StoreError, UserDirectory};
pub use router::leaderboard_router;
pub use scoring::{score_achievements, ScoreBreakdown, ScoredAchievement, ScoringConfig};
pub use service::{LeaderboardService, ServiceError};
pub use snapshot::{BoardEntryView, LeaderboardSnapshot, WinnerView};
pub use window::{active_window, monthly_winners, ranked_active_window, MonthlyCohort};
