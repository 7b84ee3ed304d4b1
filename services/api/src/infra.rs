use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use kudos::leaderboard::{
    Achievement, AchievementCategory, AchievementId, AchievementStore, Announcement,
    AnnouncementPublisher, DirectoryError, PublishError, Role, StoreError, UserDirectory,
    UserEmail, UserProfile,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAchievementStore {
    achievements: Arc<Mutex<Vec<Achievement>>>,
}

impl AchievementStore for InMemoryAchievementStore {
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryUserDirectory {
    users: Arc<Mutex<HashMap<UserEmail, UserProfile>>>,
}

impl UserDirectory for InMemoryUserDirectory {
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

/// Simulated delivery: announcements are logged, never sent anywhere.
#[derive(Default, Clone)]
pub(crate) struct LoggingAnnouncementPublisher;

impl AnnouncementPublisher for LoggingAnnouncementPublisher {
    fn publish(&self, announcement: Announcement) -> Result<(), PublishError> {
        info!(
            channel = ?announcement.channel,
            subject = %announcement.subject,
            "announcement published (simulated delivery)"
        );
        Ok(())
    }
}

fn mid_prior_month(now: DateTime<Utc>, day: u32) -> DateTime<Utc> {
    let (year, month) = match now.month() {
        1 => (now.year() - 1, 12),
        month => (now.year(), month - 1),
    };
    Utc.with_ymd_and_hms(year, month, day, 10, 0, 0)
        .single()
        .expect("valid seed timestamp")
}

fn seed_achievement(
    id_offset: i64,
    author: &str,
    title: &str,
    description: &str,
    category: AchievementCategory,
    upvotes: u32,
    created_at: DateTime<Utc>,
) -> Achievement {
    Achievement {
        id: AchievementId(created_at.timestamp_millis() + id_offset),
        author: UserEmail::new(author),
        title: title.to_string(),
        description: description.to_string(),
        category,
        upvotes,
        created_at,
        manager_scores: BTreeMap::new(),
    }
}

/// Seeds the sample users and achievements the demo and a fresh server
/// start from: three prior-month contenders plus two recent entries.
pub(crate) fn seed_sample_data(
    store: &InMemoryAchievementStore,
    directory: &InMemoryUserDirectory,
    now: DateTime<Utc>,
) {
    let users = [
        ("Emily Carter", "emily.carter@corp.com", Role::Employee),
        ("Ben \"Joker\" Miller", "ben.miller@corp.com", Role::Employee),
        ("Aisha Khan", "aisha.khan@corp.com", Role::Employee),
        ("Leo Petrov", "leo.petrov@corp.com", Role::Employee),
        ("Dana Whitfield", "dana.whitfield@corp.com", Role::Manager),
    ];
    for (name, email, role) in users {
        let _ = directory.register(UserProfile {
            email: UserEmail::new(email),
            name: name.to_string(),
            role,
        });
    }

    let seeds = [
        seed_achievement(
            1,
            "emily.carter@corp.com",
            "Mozart AI",
            "Cursor for music production, integrating with popular DAWs.",
            AchievementCategory::Content,
            406,
            mid_prior_month(now, 15),
        ),
        seed_achievement(
            2,
            "ben.miller@corp.com",
            "Jokr.bar",
            "A well-timed joke to stop your visitors from bouncing.",
            AchievementCategory::Content,
            294,
            mid_prior_month(now, 10),
        ),
        seed_achievement(
            3,
            "aisha.khan@corp.com",
            "Brain MAX by ClickUp",
            "Your knowledge plus talk-to-text across the whole workspace.",
            AchievementCategory::ProjectCoordination,
            273,
            mid_prior_month(now, 20),
        ),
        seed_achievement(
            4,
            "leo.petrov@corp.com",
            "Project Phoenix Launch",
            "Deployed the new platform ahead of schedule with zero downtime.",
            AchievementCategory::ProjectCoordination,
            255,
            now - Duration::days(5),
        ),
        seed_achievement(
            5,
            "emily.carter@corp.com",
            "Q3 Analytics Dashboard",
            "Delivered a new company-wide analytics dashboard.",
            AchievementCategory::PerformanceAds,
            150,
            now - Duration::days(2),
        ),
    ];
    for seed in seeds {
        let _ = store.insert(seed);
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn date_to_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(12, 0, 0)
        .expect("midday always exists")
        .and_utc()
}
