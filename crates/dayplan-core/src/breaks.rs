//! Pomodoro break insertion.
//!
//! Splits each placement into alternating work and break segments. A task
//! longer than one work block is stretched by the breaks between its blocks;
//! no break follows the final block.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::clock::ClockTime;
use crate::error::ScheduleError;
use crate::scheduler::{Placement, TimeSpan};

/// Break insertion configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakConfig {
    /// Length of one work block (minutes)
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    /// Break between work blocks (minutes)
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
}

fn default_work_minutes() -> u32 {
    BreakInserter::WORK_DURATION
}
fn default_break_minutes() -> u32 {
    BreakInserter::BREAK_DURATION
}

impl Default for BreakConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SegmentKind {
    Work,
    Break,
}

/// One typed span of a segmented placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Source placement for work segments, `None` for breaks
    pub placement_id: Option<String>,
    pub task_name: Option<String>,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub date: NaiveDate,
}

impl TimeSpan for Segment {
    fn start_time(&self) -> ClockTime {
        self.start_time
    }

    fn end_time(&self) -> ClockTime {
        self.end_time
    }
}

/// Splits placements into work/break segments.
pub struct BreakInserter {
    config: BreakConfig,
}

impl BreakInserter {
    pub const WORK_DURATION: u32 = 50;
    pub const BREAK_DURATION: u32 = 10;

    pub fn new() -> Self {
        Self {
            config: BreakConfig::default(),
        }
    }

    pub fn with_config(config: BreakConfig) -> Self {
        Self { config }
    }

    /// Segment every placement, in input order.
    ///
    /// A placement whose stretched span would run past 24:00 is cut off at
    /// the end of the day; the remaining placements are unaffected.
    ///
    /// # Errors
    /// `InvalidDuration` if the configured work block is zero minutes.
    pub fn insert_breaks(&self, placements: &[Placement]) -> Result<Vec<Segment>, ScheduleError> {
        if self.config.work_minutes == 0 {
            return Err(ScheduleError::InvalidDuration(
                "work block must be at least one minute".to_string(),
            ));
        }

        let mut segments = Vec::new();
        for placement in placements {
            self.segment_placement(placement, &mut segments);
        }
        Ok(segments)
    }

    fn segment_placement(&self, placement: &Placement, out: &mut Vec<Segment>) {
        let work = self.config.work_minutes;
        let total = placement.duration_minutes();
        let segment_count = total.div_ceil(work);

        let mut current = placement.start_time;
        let mut remaining = total;

        for i in 0..segment_count {
            let length = work.min(remaining);
            let (end, cut) = advance(current, length);
            if end > current {
                out.push(Segment {
                    kind: SegmentKind::Work,
                    placement_id: Some(placement.id.clone()),
                    task_name: Some(placement.name().to_string()),
                    start_time: current,
                    end_time: end,
                    date: placement.date,
                });
            }
            remaining -= end.minutes() - current.minutes();
            current = end;
            if cut {
                warn_truncated(placement, remaining);
                return;
            }

            if i + 1 < segment_count && self.config.break_minutes > 0 {
                let (end, cut) = advance(current, self.config.break_minutes);
                if end > current {
                    out.push(Segment {
                        kind: SegmentKind::Break,
                        placement_id: None,
                        task_name: None,
                        start_time: current,
                        end_time: end,
                        date: placement.date,
                    });
                }
                current = end;
                if cut {
                    warn_truncated(placement, remaining);
                    return;
                }
            }
        }
    }
}

impl Default for BreakInserter {
    fn default() -> Self {
        Self::new()
    }
}

fn warn_truncated(placement: &Placement, unsegmented_minutes: u32) {
    warn!(
        task = placement.name(),
        start = %placement.start_time,
        unsegmented_minutes,
        "segments run past 24:00, truncating placement"
    );
}

/// Move `minutes` forward from `from`, clamped to 24:00. The flag reports clamping.
fn advance(from: ClockTime, minutes: u32) -> (ClockTime, bool) {
    match from.checked_add_minutes(minutes) {
        Some(end) => (end, false),
        None => (ClockTime::END_OF_DAY, true),
    }
}
