use crate::day::CalendarDay;
use crate::leaderboard::{DailyEntry, StreakEntry};
use crate::progress::DailyProgress;
use crate::streak::Streak;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ANONYMOUS_NICKNAME: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub nickname: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        match self.nickname.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => ANONYMOUS_NICKNAME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRow {
    pub user_id: String,
    pub date_key: CalendarDay,
    pub pushups: u32,
    pub pullups: u32,
    pub updated_at: DateTime<Utc>,
}

impl ProgressRow {
    pub fn new(user_id: impl Into<String>, day: CalendarDay, progress: DailyProgress) -> Self {
        Self {
            user_id: user_id.into(),
            date_key: day,
            pushups: progress.pushups,
            pullups: progress.pullups,
            updated_at: Utc::now(),
        }
    }

    pub fn progress(&self) -> DailyProgress {
        DailyProgress {
            pushups: self.pushups,
            pullups: self.pullups,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(flatten)]
    pub streak: Streak,
}

impl Profile {
    pub fn new(id: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nickname: nickname.into(),
            streak: Streak::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub nickname: Option<String>,
}

impl AccountRow {
    pub fn user(&self) -> User {
        User {
            id: self.id.clone(),
            email: self.email.clone(),
            nickname: self.nickname.clone(),
        }
    }
}

/// Everything the JSON store keeps on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub accounts: BTreeMap<String, AccountRow>,
    #[serde(default)]
    pub progress: BTreeMap<String, BTreeMap<CalendarDay, ProgressRow>>,
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub nickname: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub exercise: crate::progress::Exercise,
    /// Raw form text, validated server side.
    pub amount: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExerciseView {
    pub done: u32,
    pub remaining: u32,
    pub goal: u32,
    pub percent: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub date: String,
    pub nickname: String,
    pub pushups: ExerciseView,
    pub pullups: ExerciseView,
    pub goal_met: bool,
    pub current_streak: u32,
    pub longest_streak: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardMode {
    #[default]
    Daily,
    Streak,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub mode: LeaderboardMode,
}

#[derive(Debug, Serialize)]
#[serde(tag = "mode", content = "entries", rename_all = "lowercase")]
pub enum LeaderboardResponse {
    Daily(Vec<DailyEntry>),
    Streak(Vec<StreakEntry>),
}
