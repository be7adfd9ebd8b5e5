//! Placement records produced by the scheduler.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::error::ScheduleError;
use crate::task::{RecurringCommitment, Task};

/// Anything occupying a concrete `[start, end)` span of the day.
pub trait TimeSpan {
    fn start_time(&self) -> ClockTime;
    fn end_time(&self) -> ClockTime;

    fn duration_minutes(&self) -> u32 {
        self.end_time()
            .minutes()
            .saturating_sub(self.start_time().minutes())
    }

    fn overlaps(&self, other: &dyn TimeSpan) -> bool {
        self.start_time() < other.end_time() && other.start_time() < self.end_time()
    }
}

/// What a placement binds to a time slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacedItem {
    Task(Task),
    Commitment(RecurringCommitment),
}

impl PlacedItem {
    pub fn id(&self) -> &str {
        match self {
            PlacedItem::Task(t) => t.id(),
            PlacedItem::Commitment(c) => c.id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PlacedItem::Task(t) => t.name(),
            PlacedItem::Commitment(c) => c.name(),
        }
    }
}

/// A task or commitment bound to a concrete start/end on a date.
///
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: String,
    pub item: PlacedItem,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub date: NaiveDate,
}

impl Placement {
    pub(crate) fn new(
        item: PlacedItem,
        start_time: ClockTime,
        end_time: ClockTime,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            item,
            start_time,
            end_time,
            date,
        }
    }

    pub fn is_commitment(&self) -> bool {
        matches!(self.item, PlacedItem::Commitment(_))
    }

    pub fn name(&self) -> &str {
        self.item.name()
    }
}

impl TimeSpan for Placement {
    fn start_time(&self) -> ClockTime {
        self.start_time
    }

    fn end_time(&self) -> ClockTime {
        self.end_time
    }
}

/// An entry already on the calendar, loaded as an opaque conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BookingRecord")]
pub struct Booking {
    id: Option<String>,
    start_time: ClockTime,
    end_time: ClockTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

impl Booking {
    pub fn new(
        id: Option<String>,
        start_time: ClockTime,
        end_time: ClockTime,
    ) -> Result<Self, ScheduleError> {
        if start_time >= end_time {
            return Err(ScheduleError::InvalidTime(format!(
                "booking end {end_time} must be after start {start_time}"
            )));
        }
        Ok(Self {
            id,
            start_time,
            end_time,
        })
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl TryFrom<BookingRecord> for Booking {
    type Error = ScheduleError;

    fn try_from(r: BookingRecord) -> Result<Self, Self::Error> {
        Booking::new(r.id, r.start_time, r.end_time)
    }
}

impl TimeSpan for Booking {
    fn start_time(&self) -> ClockTime {
        self.start_time
    }

    fn end_time(&self) -> ClockTime {
        self.end_time
    }
}

/// A free slot returned by the earliest-slot search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeSpan for Slot {
    fn start_time(&self) -> ClockTime {
        self.start
    }

    fn end_time(&self) -> ClockTime {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> ClockTime {
        ClockTime::from_hm(h, m).unwrap()
    }

    #[test]
    fn booking_requires_positive_span() {
        assert!(Booking::new(None, t(9, 0), t(10, 0)).is_ok());
        assert!(Booking::new(None, t(10, 0), t(10, 0)).is_err());
        assert!(Booking::new(None, t(11, 0), t(10, 0)).is_err());
    }

    #[test]
    fn booking_deserializes_with_validation() {
        let b: Booking =
            serde_json::from_str(r#"{"start_time":"08:00","end_time":"09:00"}"#).unwrap();
        assert_eq!(b.duration_minutes(), 60);
        assert!(b.id().is_none());

        let bad = serde_json::from_str::<Booking>(r#"{"start_time":"09:00","end_time":"08:00"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn spans_overlap_half_open() {
        let a = Booking::new(None, t(9, 0), t(10, 0)).unwrap();
        let b = Booking::new(None, t(10, 0), t(11, 0)).unwrap();
        let c = Booking::new(None, t(9, 30), t(10, 30)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn placement_serializes_item_kind() {
        let task = Task::new("t1", "Deep work", 5, 5, 1.0, None).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let p = Placement::new(PlacedItem::Task(task), t(9, 0), t(10, 0), date);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["item"]["kind"], "task");
        assert_eq!(json["start_time"], "09:00");
        assert_eq!(json["date"], "2024-03-01");
        assert!(!p.is_commitment());
        assert_eq!(p.name(), "Deep work");
    }
}
