use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::info;

use super::announce::{
    social_post, winner_email, Announcement, AnnouncementPublisher, PublishError,
};
use super::domain::{
    Achievement, AchievementId, AchievementCategory, Role, RubricError, RubricScore, UserEmail,
    UserProfile,
};
use super::repository::{AchievementStore, DirectoryError, StoreError, UserDirectory};
use super::scoring::ScoringConfig;
use super::snapshot::LeaderboardSnapshot;

static LAST_ISSUED_ID: AtomicI64 = AtomicI64::new(0);

/// Wall-clock millisecond id, nudged past the previous issue so ids stay
/// strictly increasing even when two submissions land in the same tick.
fn next_achievement_id(now: DateTime<Utc>) -> AchievementId {
    let candidate = now.timestamp_millis();
    let mut issued = candidate;
    let _ = LAST_ISSUED_ID.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
        issued = candidate.max(last + 1);
        Some(issued)
    });
    AchievementId(issued)
}

/// Orchestration layer over the pure engine: owns the mutation entry
/// points, the per-voter toggle ledger, and the re-run-everything cadence.
/// Count and rating mutations go through the store's atomic `modify`, and
/// toggles additionally hold the ledger lock across the store write, so
/// concurrent mutations of one achievement never lose an update. The
/// engine itself is a total function over each consistent snapshot.
pub struct LeaderboardService<S, D, N> {
    store: Arc<S>,
    directory: Arc<D>,
    publisher: Arc<N>,
    config: ScoringConfig,
    // Voter identity is a caller concern; the engine never sees it.
    voted: Mutex<HashSet<(UserEmail, AchievementId)>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),
    #[error("publish error: {0}")]
    Publish(#[from] PublishError),
    #[error("no registered user with email '{0}'")]
    UnknownUser(UserEmail),
    #[error("no achievement with id {0}")]
    UnknownAchievement(AchievementId),
    #[error("'{0}' does not hold the manager role")]
    NotAManager(UserEmail),
    #[error(transparent)]
    Rubric(#[from] RubricError),
}

impl<S, D, N> LeaderboardService<S, D, N>
where
    S: AchievementStore + 'static,
    D: UserDirectory + 'static,
    N: AnnouncementPublisher + 'static,
{
    pub fn new(store: Arc<S>, directory: Arc<D>, publisher: Arc<N>, config: ScoringConfig) -> Self {
        Self {
            store,
            directory,
            publisher,
            config,
            voted: Mutex::new(HashSet::new()),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Registers a participant. The email is normalized here, at the
    /// boundary; the role is fixed for the lifetime of the account.
    pub fn register(
        &self,
        name: impl Into<String>,
        email: &str,
        role: Role,
    ) -> Result<UserProfile, ServiceError> {
        let profile = UserProfile {
            email: UserEmail::new(email),
            name: name.into(),
            role,
        };
        self.directory.register(profile.clone())?;
        info!(email = %profile.email, role = profile.role.label(), "user registered");
        Ok(profile)
    }

    /// Appends a new achievement: zero upvotes, empty rubric map, stamped
    /// with `now`. The author must already be registered.
    pub fn submit(
        &self,
        author_email: &str,
        title: impl Into<String>,
        description: impl Into<String>,
        category: AchievementCategory,
        now: DateTime<Utc>,
    ) -> Result<Achievement, ServiceError> {
        let author = UserEmail::new(author_email);
        self.directory
            .lookup(&author)?
            .ok_or_else(|| ServiceError::UnknownUser(author.clone()))?;

        let achievement = Achievement {
            id: next_achievement_id(now),
            author,
            title: title.into(),
            description: description.into(),
            category,
            upvotes: 0,
            created_at: now,
            manager_scores: BTreeMap::new(),
        };

        let stored = self.store.insert(achievement)?;
        info!(id = %stored.id, author = %stored.author, "achievement submitted");
        Ok(stored)
    }

    /// Toggles one voter's upvote on one achievement: +1 on first call,
    /// -1 when the same voter toggles again. The ledger guarantees a voter
    /// never moves a count by more than one in either direction. The
    /// ledger lock is held across the store write, and the ledger entry
    /// is only committed once the store accepts the new count.
    pub fn toggle_upvote(
        &self,
        id: AchievementId,
        voter_email: &str,
    ) -> Result<Achievement, ServiceError> {
        let voter = UserEmail::new(voter_email);
        self.directory
            .lookup(&voter)?
            .ok_or_else(|| ServiceError::UnknownUser(voter.clone()))?;

        let key = (voter, id);
        let mut voted = self.voted.lock().expect("vote ledger mutex poisoned");
        let removing = voted.contains(&key);

        let achievement = self
            .store
            .modify(id, &mut |achievement| {
                if removing {
                    achievement.upvotes = achievement.upvotes.saturating_sub(1);
                } else {
                    achievement.upvotes += 1;
                }
            })
            .map_err(|error| match error {
                StoreError::NotFound => ServiceError::UnknownAchievement(id),
                other => ServiceError::Store(other),
            })?;

        if removing {
            voted.remove(&key);
        } else {
            voted.insert(key);
        }
        Ok(achievement)
    }

    /// Upserts one manager's rubric rating, keyed by the manager's email:
    /// re-rating replaces the prior rating wholesale and can never stack.
    pub fn save_rating(
        &self,
        id: AchievementId,
        manager_email: &str,
        rating: RubricScore,
    ) -> Result<Achievement, ServiceError> {
        let manager = UserEmail::new(manager_email);
        let profile = self
            .directory
            .lookup(&manager)?
            .ok_or_else(|| ServiceError::UnknownUser(manager.clone()))?;
        if profile.role != Role::Manager {
            return Err(ServiceError::NotAManager(manager));
        }

        let achievement = self
            .store
            .modify(id, &mut |achievement| {
                achievement.manager_scores.insert(manager.clone(), rating);
            })
            .map_err(|error| match error {
                StoreError::NotFound => ServiceError::UnknownAchievement(id),
                other => ServiceError::Store(other),
            })?;

        info!(id = %id, manager = %manager, "rubric rating saved");
        Ok(achievement)
    }

    /// The rating a manager's form should open with: their existing
    /// rating if they already scored this achievement, neutral otherwise.
    pub fn rating_draft(
        &self,
        id: AchievementId,
        manager_email: &str,
    ) -> Result<RubricScore, ServiceError> {
        let manager = UserEmail::new(manager_email);
        let achievement = self
            .store
            .fetch(id)?
            .ok_or(ServiceError::UnknownAchievement(id))?;
        Ok(achievement
            .manager_scores
            .get(&manager)
            .copied()
            .unwrap_or_else(RubricScore::neutral))
    }

    /// Changes a display name. Achievements reference authors by email, so
    /// no history rewrite is needed; every name-resolved view picks up the
    /// new name on the next read.
    pub fn rename(&self, email: &str, new_name: impl Into<String>) -> Result<UserProfile, ServiceError> {
        let email = UserEmail::new(email);
        let profile = self.directory.rename(&email, new_name.into())?;
        info!(email = %email, "display name changed");
        Ok(profile)
    }

    /// Lifetime upvote total across one user's achievements.
    pub fn total_votes_received(&self, email: &str) -> Result<u32, ServiceError> {
        let email = UserEmail::new(email);
        let total = self
            .store
            .all()?
            .iter()
            .filter(|achievement| achievement.author == email)
            .map(|achievement| achievement.upvotes)
            .sum();
        Ok(total)
    }

    /// Recomputes the full derived state from the current canonical data.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Result<LeaderboardSnapshot, ServiceError> {
        let achievements = self.store.all()?;
        let users = self.directory.all()?;
        Ok(LeaderboardSnapshot::compute(
            &achievements,
            &users,
            now,
            &self.config,
        ))
    }

    pub fn users(&self) -> Result<BTreeMap<UserEmail, UserProfile>, ServiceError> {
        Ok(self.directory.all()?)
    }

    /// Renders and publishes the monthly digest plus one social post per
    /// winner. Delivery is simulated through the publisher hook.
    pub fn announce_winners(&self, now: DateTime<Utc>) -> Result<Vec<Announcement>, ServiceError> {
        let snapshot = self.snapshot(now)?;
        let users = self.directory.all()?;
        let winners = snapshot.winner_views(&users);

        let mut announcements = vec![winner_email(&snapshot.cohort.month_label, &winners)];
        for winner in &winners {
            announcements.push(social_post(winner));
        }

        for announcement in &announcements {
            self.publisher.publish(announcement.clone())?;
        }
        info!(
            month = %snapshot.cohort.month_label,
            count = announcements.len(),
            "winner announcements published"
        );
        Ok(announcements)
    }
}
