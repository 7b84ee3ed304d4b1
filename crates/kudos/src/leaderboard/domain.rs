use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier for a submitted achievement, derived from a wall-clock
/// millisecond timestamp so ordering by id tracks recency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AchievementId(pub i64);

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowercased email used as the stable identity for every participant.
///
/// Achievements reference their author through this key rather than the
/// mutable display name, so renames never rewrite achievement history.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserEmail(String);

impl UserEmail {
    /// Normalizes the address to lowercase; callers at every boundary go
    /// through here so two spellings of one mailbox never diverge.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of recognition categories used by the submission form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Seo,
    PerformanceAds,
    Content,
    DesignEditing,
    SocialMedia,
    ProjectCoordination,
}

impl AchievementCategory {
    pub const ALL: [AchievementCategory; 6] = [
        AchievementCategory::Seo,
        AchievementCategory::PerformanceAds,
        AchievementCategory::Content,
        AchievementCategory::DesignEditing,
        AchievementCategory::SocialMedia,
        AchievementCategory::ProjectCoordination,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            AchievementCategory::Seo => "SEO",
            AchievementCategory::PerformanceAds => "Performance Ads",
            AchievementCategory::Content => "Content",
            AchievementCategory::DesignEditing => "Design / Editing",
            AchievementCategory::SocialMedia => "Social Media",
            AchievementCategory::ProjectCoordination => "Project Coordination",
        }
    }
}

/// One manager's rubric rating of one achievement, each axis in [1, 5].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricScore {
    pub campaign_impact: u8,
    pub creativity: u8,
    pub ownership: u8,
    pub team_support: u8,
}

/// Rejection raised when a rubric dimension falls outside [1, 5].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rubric dimension '{dimension}' is {value}, expected 1 through 5")]
pub struct RubricError {
    pub dimension: &'static str,
    pub value: u8,
}

impl RubricScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Validates all four dimensions; the scoring engine itself assumes
    /// range-checked input and never re-validates.
    pub fn new(
        campaign_impact: u8,
        creativity: u8,
        ownership: u8,
        team_support: u8,
    ) -> Result<Self, RubricError> {
        for (dimension, value) in [
            ("campaign_impact", campaign_impact),
            ("creativity", creativity),
            ("ownership", ownership),
            ("team_support", team_support),
        ] {
            if !(Self::MIN..=Self::MAX).contains(&value) {
                return Err(RubricError { dimension, value });
            }
        }

        Ok(Self {
            campaign_impact,
            creativity,
            ownership,
            team_support,
        })
    }

    /// The value pre-filled when a manager opens the rating form for an
    /// achievement they have not scored yet.
    pub const fn neutral() -> Self {
        Self {
            campaign_impact: 3,
            creativity: 3,
            ownership: 3,
            team_support: 3,
        }
    }

    /// Sum of the four dimensions, in [4, 20].
    pub fn total(&self) -> u32 {
        u32::from(self.campaign_impact)
            + u32::from(self.creativity)
            + u32::from(self.ownership)
            + u32::from(self.team_support)
    }
}

/// A unit of recognized work. Carries only canonical fields; derived
/// scores live on [`ScoredAchievement`](super::scoring::ScoredAchievement)
/// so stale values cannot be read back by accident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub author: UserEmail,
    pub title: String,
    pub description: String,
    pub category: AchievementCategory,
    pub upvotes: u32,
    pub created_at: DateTime<Utc>,
    /// Keyed by the rating manager's email; a manager overwrites their own
    /// prior rating wholesale, never holds two.
    pub manager_scores: BTreeMap<UserEmail, RubricScore>,
}

impl Achievement {
    /// Average rubric total across every manager who rated this
    /// achievement, or `None` when nobody has.
    pub fn average_rubric_total(&self) -> Option<f64> {
        if self.manager_scores.is_empty() {
            return None;
        }
        let sum: u32 = self.manager_scores.values().map(RubricScore::total).sum();
        Some(f64::from(sum) / self.manager_scores.len() as f64)
    }
}

/// Participant role. Fixed at registration; no role-change operation exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Manager,
    Employee,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Employee => "employee",
        }
    }
}

/// Registered participant as the engine sees them: identity, current
/// display name, role. Badges are derived per pass, never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: UserEmail,
    pub name: String,
    pub role: Role,
}

/// Derived recognition tag, recomputed in full on every scoring pass.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    FirstSubmission,
    HundredUpvotes,
    TopVotedMonthly,
}

impl Badge {
    pub const fn label(self) -> &'static str {
        match self {
            Badge::FirstSubmission => "First Submission",
            Badge::HundredUpvotes => "100 Upvotes Club",
            Badge::TopVotedMonthly => "Top Voted Monthly",
        }
    }
}

const AVATAR_POOL: [&str; 6] = [
    "https://images.pexels.com/photos/774909/pexels-photo-774909.jpeg?auto=compress&cs=tinysrgb&w=160&h=160&dpr=1",
    "https://images.pexels.com/photos/614810/pexels-photo-614810.jpeg?auto=compress&cs=tinysrgb&w=160&h=160&dpr=1",
    "https://images.pexels.com/photos/1181686/pexels-photo-1181686.jpeg?auto=compress&cs=tinysrgb&w=160&h=160&dpr=1",
    "https://images.pexels.com/photos/943084/pexels-photo-943084.jpeg?auto=compress&cs=tinysrgb&w=160&h=160&dpr=1",
    "https://images.pexels.com/photos/220453/pexels-photo-220453.jpeg?auto=compress&cs=tinysrgb&w=160&h=160&dpr=1",
    "https://images.pexels.com/photos/1587009/pexels-photo-1587009.jpeg?auto=compress&cs=tinysrgb&w=160&h=160&dpr=1",
];

/// Deterministic avatar for a display name, picked from a fixed pool by a
/// 32-bit string hash. Presentation-time only; nothing persists this.
pub fn avatar_for_name(name: &str) -> &'static str {
    let mut hash: i32 = 0;
    for ch in name.encode_utf16() {
        hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(i32::from(ch));
    }
    AVATAR_POOL[hash.unsigned_abs() as usize % AVATAR_POOL.len()]
}
