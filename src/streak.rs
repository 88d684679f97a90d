use crate::day::CalendarDay;
use serde::{Deserialize, Serialize};

/// Consecutive days on which both goals were met.
///
/// A broken streak is never detected eagerly: it shows up the next time
/// [`Streak::record_goal_met`] is called with a day that does not follow
/// `last_goal_met_date`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streak {
    #[serde(rename = "current_streak", default)]
    pub current: u32,
    #[serde(rename = "longest_streak", default)]
    pub longest: u32,
    #[serde(default)]
    pub last_goal_met_date: Option<CalendarDay>,
}

impl Streak {
    /// Counts `today` towards the streak. Returns `false` when `today` was
    /// already counted.
    pub fn record_goal_met(&mut self, today: CalendarDay) -> bool {
        if self.last_goal_met_date == Some(today) {
            return false;
        }

        let continues = match (self.last_goal_met_date, today.previous_day()) {
            (Some(last), Some(yesterday)) => last == yesterday,
            _ => false,
        };
        self.current = if continues { self.current.saturating_add(1) } else { 1 };
        self.longest = self.longest.max(self.current);
        self.last_goal_met_date = Some(today);
        true
    }
}
