//! Chronotypes and the search windows they map to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::clock::{ClockTime, MINUTES_PER_DAY};
use crate::error::ScheduleError;

/// A whole-hour range `[start_hour, end_hour)` searched for free slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchWindow {
    start_hour: u32,
    end_hour: u32,
}

impl SearchWindow {
    /// 06:00 - 22:00, the full-day fallback.
    pub const FULL_DAY: SearchWindow = SearchWindow::fixed(6, 22);

    const fn fixed(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, ScheduleError> {
        if start_hour >= end_hour || end_hour > 24 {
            return Err(ScheduleError::InvalidTime(format!(
                "search window {start_hour}-{end_hour} must satisfy start < end <= 24"
            )));
        }
        Ok(Self::fixed(start_hour, end_hour))
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn start_minutes(&self) -> u32 {
        self.start_hour * 60
    }

    pub fn end_minutes(&self) -> u32 {
        (self.end_hour * 60).min(MINUTES_PER_DAY)
    }

    pub fn span_minutes(&self) -> u32 {
        self.end_minutes().saturating_sub(self.start_minutes())
    }

    /// Whether `[start, end)` lies entirely inside the window.
    pub fn contains(&self, start: ClockTime, end: ClockTime) -> bool {
        start.minutes() >= self.start_minutes() && end.minutes() <= self.end_minutes()
    }
}

impl fmt::Display for SearchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.start_hour, self.end_hour)
    }
}

/// A user's preferred productive time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Chronotype {
    /// Morning person, peak 06:00-12:00
    Early,
    /// Intermediate, peak 10:00-16:00
    Middle,
    /// Evening person, peak 14:00-20:00
    Late,
    /// Unrecognized tag; the peak window is the whole day
    #[default]
    Other,
}

impl Chronotype {
    /// Peak window for this chronotype. `Other` gets `fallback`.
    pub fn peak_window_or(&self, fallback: SearchWindow) -> SearchWindow {
        match self {
            Chronotype::Early => SearchWindow::fixed(6, 12),
            Chronotype::Middle => SearchWindow::fixed(10, 16),
            Chronotype::Late => SearchWindow::fixed(14, 20),
            Chronotype::Other => fallback,
        }
    }

    pub fn peak_window(&self) -> SearchWindow {
        self.peak_window_or(SearchWindow::FULL_DAY)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Chronotype::Early => "Early",
            Chronotype::Middle => "Middle",
            Chronotype::Late => "Late",
            Chronotype::Other => "Other",
        }
    }
}

impl fmt::Display for Chronotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Chronotype {
    fn from(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "early" => Chronotype::Early,
            "middle" => Chronotype::Middle,
            "late" => Chronotype::Late,
            _ => Chronotype::Other,
        }
    }
}

impl FromStr for Chronotype {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Chronotype::from(s))
    }
}

impl Serialize for Chronotype {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Chronotype {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Chronotype::from(tag.as_str()))
    }
}
