use serde::{Deserialize, Serialize};
use std::fmt;

pub const PUSHUP_GOAL: u32 = 100;
pub const PULLUP_GOAL: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exercise {
    Pushups,
    Pullups,
}

impl Exercise {
    pub fn as_str(self) -> &'static str {
        match self {
            Exercise::Pushups => "pushups",
            Exercise::Pullups => "pullups",
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Daily targets, one per exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goals {
    pub pushups: u32,
    pub pullups: u32,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            pushups: PUSHUP_GOAL,
            pullups: PULLUP_GOAL,
        }
    }
}

impl Goals {
    pub fn goal_for(&self, exercise: Exercise) -> u32 {
        match exercise {
            Exercise::Pushups => self.pushups,
            Exercise::Pullups => self.pullups,
        }
    }
}

/// Counts recorded for one user on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyProgress {
    pub pushups: u32,
    pub pullups: u32,
}

impl DailyProgress {
    pub fn count(&self, exercise: Exercise) -> u32 {
        match exercise {
            Exercise::Pushups => self.pushups,
            Exercise::Pullups => self.pullups,
        }
    }

    pub fn set(&mut self, exercise: Exercise, value: u32) {
        match exercise {
            Exercise::Pushups => self.pushups = value,
            Exercise::Pullups => self.pullups = value,
        }
    }

    pub fn is_goal_met(&self, goals: &Goals) -> bool {
        is_goal_met(self.pushups, self.pullups, goals)
    }
}

/// Adds `delta` to `current` unless the result would pass `goal`.
///
/// Returns the new value and whether the increment was accepted. A rejected
/// increment leaves the value unchanged; overshoot is never clamped.
pub fn clamp_increment(current: u32, delta: u32, goal: u32) -> (u32, bool) {
    if current >= goal {
        return (current, false);
    }
    match current.checked_add(delta) {
        Some(next) if next <= goal => (next, true),
        _ => (current, false),
    }
}

pub fn is_goal_met(pushups: u32, pullups: u32, goals: &Goals) -> bool {
    pushups >= goals.pushups && pullups >= goals.pullups
}

pub fn remaining(count: u32, goal: u32) -> u32 {
    goal.saturating_sub(count)
}

/// Share of the goal reached, capped at 100. Only drives the progress ring.
pub fn percent_complete(count: u32, goal: u32) -> f64 {
    if goal == 0 {
        return 100.0;
    }
    (100.0 * f64::from(count) / f64::from(goal)).min(100.0)
}
