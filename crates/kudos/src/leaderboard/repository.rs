use std::collections::BTreeMap;

use super::domain::{Achievement, AchievementId, UserEmail, UserProfile};

/// Storage abstraction over the canonical achievement list so the service
/// can be exercised without a real backend. Implementations hold the only
/// mutable copy; the engine itself never writes.
pub trait AchievementStore: Send + Sync {
    fn insert(&self, achievement: Achievement) -> Result<Achievement, StoreError>;
    fn fetch(&self, id: AchievementId) -> Result<Option<Achievement>, StoreError>;
    /// Applies `apply` to the stored achievement under the store's own
    /// lock and returns the updated copy. Concurrent mutations of the
    /// same achievement therefore never interleave a read with a write.
    fn modify(
        &self,
        id: AchievementId,
        apply: &mut dyn FnMut(&mut Achievement),
    ) -> Result<Achievement, StoreError>;
    /// Full canonical list in insertion order. The scoring pipeline always
    /// consumes the whole set.
    fn all(&self) -> Result<Vec<Achievement>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("achievement already exists")]
    Conflict,
    #[error("achievement not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Registry of participants keyed by normalized email.
pub trait UserDirectory: Send + Sync {
    fn register(&self, profile: UserProfile) -> Result<(), DirectoryError>;
    fn lookup(&self, email: &UserEmail) -> Result<Option<UserProfile>, DirectoryError>;
    /// Updates the display name only; identity and role are immutable.
    fn rename(&self, email: &UserEmail, new_name: String) -> Result<UserProfile, DirectoryError>;
    fn all(&self) -> Result<BTreeMap<UserEmail, UserProfile>, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("user already registered")]
    Conflict,
    #[error("user not found")]
    NotFound,
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}
