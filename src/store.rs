use crate::day::CalendarDay;
use crate::errors::StoreError;
use crate::models::{Profile, ProgressRow};
use async_trait::async_trait;

/// Per-user, per-day progress rows.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn get(&self, user_id: &str, day: CalendarDay) -> Result<Option<ProgressRow>, StoreError>;

    /// Writes the row for `(user_id, date_key)`, replacing any existing one.
    async fn upsert(&self, row: ProgressRow) -> Result<(), StoreError>;

    async fn list_for_day(&self, day: CalendarDay) -> Result<Vec<ProgressRow>, StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankField {
    CurrentStreak,
    LongestStreak,
}

impl RankField {
    pub fn value(self, profile: &Profile) -> u32 {
        match self {
            RankField::CurrentStreak => profile.streak.current,
            RankField::LongestStreak => profile.streak.longest,
        }
    }
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Profile>, StoreError>;

    /// Fails with [`StoreError::Conflict`] when a profile with the same id exists.
    async fn insert(&self, profile: Profile) -> Result<(), StoreError>;

    async fn upsert(&self, profile: Profile) -> Result<(), StoreError>;

    /// Profiles ordered by `field`, highest first.
    async fn list_ranked(&self, field: RankField, limit: usize) -> Result<Vec<Profile>, StoreError>;
}
