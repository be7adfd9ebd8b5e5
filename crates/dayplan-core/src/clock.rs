//! Wall-clock values within a single day.
//!
//! The scheduler works in whole minutes since midnight. `ClockTime` carries
//! that value with the range check attached, so every interval that reaches
//! the conflict index already satisfies `0 <= start < end <= 1440`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ScheduleError;

/// Minutes in one day. Valid only as an end bound.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A time of day in minutes since midnight, `0..=1440`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u32);

impl ClockTime {
    pub const END_OF_DAY: ClockTime = ClockTime(MINUTES_PER_DAY);

    /// Build from an hour/minute pair. `24:00` is accepted as end of day.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, ScheduleError> {
        if minute > 59 || hour > 24 || (hour == 24 && minute != 0) {
            return Err(ScheduleError::InvalidTime(format!(
                "{hour:02}:{minute:02} is not a time of day"
            )));
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Build from minutes since midnight.
    pub fn from_minutes(minutes: u32) -> Result<Self, ScheduleError> {
        if minutes > MINUTES_PER_DAY {
            return Err(ScheduleError::InvalidTime(format!(
                "{minutes} minutes is past the end of the day"
            )));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0 / 60
    }

    pub fn minute(self) -> u32 {
        self.0 % 60
    }

    /// Add minutes, returning `None` if the result runs past 24:00.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<Self> {
        let total = self.0.checked_add(minutes)?;
        (total <= MINUTES_PER_DAY).then_some(Self(total))
    }

    /// Convert to `NaiveTime`. End of day has no `NaiveTime` form.
    pub fn to_naive_time(self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(time: NaiveTime) -> Self {
        Self(time.hour() * 60 + time.minute())
    }
}

impl FromStr for ClockTime {
    type Err = ScheduleError;

    /// Parse `HH:MM` or `HH:MM:SS`. Seconds are dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidTime(format!("'{s}' must be HH:MM or HH:MM:SS"));

        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 2 && parts.len() != 3 {
            return Err(invalid());
        }

        let hour: u32 = parts[0].parse().map_err(|_| invalid())?;
        let minute: u32 = parts[1].parse().map_err(|_| invalid())?;
        if let Some(seconds) = parts.get(2) {
            let seconds: u32 = seconds.parse().map_err(|_| invalid())?;
            if seconds > 59 || (hour == 24 && seconds != 0) {
                return Err(invalid());
            }
        }

        Self::from_hm(hour, minute)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Convert an hour count to whole minutes, rounding to the nearest minute.
///
/// Non-positive and non-finite inputs map to 0 so callers can treat them as
/// an empty duration.
pub fn hours_to_minutes(hours: f64) -> u32 {
    if !hours.is_finite() || hours <= 0.0 {
        return 0;
    }
    let minutes = (hours * 60.0).round();
    if minutes >= u32::MAX as f64 {
        u32::MAX
    } else {
        minutes as u32
    }
}
