use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::leaderboard::announce::{Announcement, AnnouncementPublisher, PublishError};
use crate::leaderboard::domain::{
    Achievement, AchievementCategory, AchievementId, Role, RubricScore, UserEmail, UserProfile,
};
use crate::leaderboard::repository::{
    AchievementStore, DirectoryError, StoreError, UserDirectory,
};
use crate::leaderboard::scoring::ScoringConfig;
use crate::leaderboard::service::LeaderboardService;

#[derive(Default)]
pub(super) struct MemoryStore {
    achievements: Mutex<Vec<Achievement>>,
}

impl AchievementStore for MemoryStore {
    fn insert(&self, achievement: Achievement) -> Result<Achievement, StoreError> {
        let mut guard = self.achievements.lock().expect("store mutex poisoned");
        if guard.iter().any(|existing| existing.id == achievement.id) {
            return Err(StoreError::Conflict);
        }
        guard.push(achievement.clone());
        Ok(achievement)
    }

    fn modify(
        &self,
        id: AchievementId,
        apply: &mut dyn FnMut(&mut Achievement),
    ) -> Result<Achievement, StoreError> {
        let mut guard = self.achievements.lock().expect("store mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == id) {
            Some(slot) => {
                apply(slot);
                Ok(slot.clone())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn fetch(&self, id: AchievementId) -> Result<Option<Achievement>, StoreError> {
        let guard = self.achievements.lock().expect("store mutex poisoned");
        Ok(guard.iter().find(|existing| existing.id == id).cloned())
    }

    fn all(&self) -> Result<Vec<Achievement>, StoreError> {
        Ok(self.achievements.lock().expect("store mutex poisoned").clone())
    }
}

#[derive(Default)]
pub(super) struct MemoryDirectory {
    users: Mutex<HashMap<UserEmail, UserProfile>>,
}

impl UserDirectory for MemoryDirectory {
    fn register(&self, profile: UserProfile) -> Result<(), DirectoryError> {
        let mut guard = self.users.lock().expect("directory mutex poisoned");
        if guard.contains_key(&profile.email) {
            return Err(DirectoryError::Conflict);
        }
        guard.insert(profile.email.clone(), profile);
        Ok(())
    }

    fn lookup(&self, email: &UserEmail) -> Result<Option<UserProfile>, DirectoryError> {
        let guard = self.users.lock().expect("directory mutex poisoned");
        Ok(guard.get(email).cloned())
    }

    fn rename(&self, email: &UserEmail, new_name: String) -> Result<UserProfile, DirectoryError> {
        let mut guard = self.users.lock().expect("directory mutex poisoned");
        let profile = guard.get_mut(email).ok_or(DirectoryError::NotFound)?;
        profile.name = new_name;
        Ok(profile.clone())
    }

    fn all(&self) -> Result<BTreeMap<UserEmail, UserProfile>, DirectoryError> {
        let guard = self.users.lock().expect("directory mutex poisoned");
        Ok(guard
            .iter()
            .map(|(email, profile)| (email.clone(), profile.clone()))
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryPublisher {
    sent: Mutex<Vec<Announcement>>,
}

impl AnnouncementPublisher for MemoryPublisher {
    fn publish(&self, announcement: Announcement) -> Result<(), PublishError> {
        self.sent
            .lock()
            .expect("publisher mutex poisoned")
            .push(announcement);
        Ok(())
    }
}

impl MemoryPublisher {
    pub(super) fn sent(&self) -> Vec<Announcement> {
        self.sent.lock().expect("publisher mutex poisoned").clone()
    }
}

pub(super) type TestService = LeaderboardService<MemoryStore, MemoryDirectory, MemoryPublisher>;

pub(super) fn build_service() -> (
    Arc<TestService>,
    Arc<MemoryStore>,
    Arc<MemoryDirectory>,
    Arc<MemoryPublisher>,
) {
    let store = Arc::new(MemoryStore::default());
    let directory = Arc::new(MemoryDirectory::default());
    let publisher = Arc::new(MemoryPublisher::default());
    let service = Arc::new(LeaderboardService::new(
        store.clone(),
        directory.clone(),
        publisher.clone(),
        ScoringConfig::default(),
    ));
    (service, store, directory, publisher)
}

pub(super) fn email(raw: &str) -> UserEmail {
    UserEmail::new(raw)
}

pub(super) fn profile(name: &str, address: &str, role: Role) -> UserProfile {
    UserProfile {
        email: email(address),
        name: name.to_string(),
        role,
    }
}

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn achievement(
    id: i64,
    author: &str,
    upvotes: u32,
    created_at: DateTime<Utc>,
) -> Achievement {
    Achievement {
        id: AchievementId(id),
        author: email(author),
        title: format!("achievement-{id}"),
        description: "fixture".to_string(),
        category: AchievementCategory::Content,
        upvotes,
        created_at,
        manager_scores: BTreeMap::new(),
    }
}

pub(super) fn rubric(value: u8) -> RubricScore {
    RubricScore::new(value, value, value, value).expect("fixture rubric in range")
}

pub(super) fn user_map(profiles: &[UserProfile]) -> BTreeMap<UserEmail, UserProfile> {
    profiles
        .iter()
        .map(|profile| (profile.email.clone(), profile.clone()))
        .collect()
}
