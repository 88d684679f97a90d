//! Ranking of already-fetched rows. Nothing here touches a store.

use crate::models::{ANONYMOUS_NICKNAME, Profile, ProgressRow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const LEADERBOARD_SIZE: usize = 10;

/// Pullups count double.
///
/// An earlier revision of the daily board ranked by pushups alone; the
/// weighted sum is the one in use.
pub fn daily_score(pushups: u32, pullups: u32) -> u64 {
    u64::from(pushups) + 2 * u64::from(pullups)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedProgress {
    pub user_id: String,
    pub pushups: u32,
    pub pullups: u32,
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub nickname: String,
    pub pushups: u32,
    pub pullups: u32,
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakEntry {
    pub nickname: String,
    pub score: u32,
}

/// Scores one day's rows and keeps the top entries. Equal scores keep the
/// order in which the rows were fetched.
pub fn rank_daily(rows: Vec<ProgressRow>) -> Vec<RankedProgress> {
    let mut ranked: Vec<RankedProgress> = rows
        .into_iter()
        .map(|row| RankedProgress {
            score: daily_score(row.pushups, row.pullups),
            user_id: row.user_id,
            pushups: row.pushups,
            pullups: row.pullups,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(LEADERBOARD_SIZE);
    ranked
}

/// Attaches nicknames by user id; users without a profile get the placeholder.
pub fn join_nicknames(
    ranked: Vec<RankedProgress>,
    nicknames: &HashMap<String, String>,
) -> Vec<DailyEntry> {
    ranked
        .into_iter()
        .map(|entry| DailyEntry {
            nickname: nickname_or_placeholder(nicknames.get(&entry.user_id).map(String::as_str)),
            pushups: entry.pushups,
            pullups: entry.pullups,
            score: entry.score,
        })
        .collect()
}

pub fn streak_board(mut profiles: Vec<Profile>) -> Vec<StreakEntry> {
    profiles.sort_by(|a, b| b.streak.current.cmp(&a.streak.current));
    profiles
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .map(|profile| StreakEntry {
            nickname: nickname_or_placeholder(Some(profile.nickname.as_str())),
            score: profile.streak.current,
        })
        .collect()
}

fn nickname_or_placeholder(nickname: Option<&str>) -> String {
    match nickname.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => ANONYMOUS_NICKNAME.to_string(),
    }
}
