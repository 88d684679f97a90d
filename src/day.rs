use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

const KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar day, independent of time zone and locale once constructed.
///
/// Serialized as a `YYYY-MM-DD` key, which is also the on-disk key of the
/// daily progress rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today in the server's local time zone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn previous_day(self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn key(self) -> String {
        self.0.format(KEY_FORMAT).to_string()
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for CalendarDay {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), KEY_FORMAT).map(Self)
    }
}
