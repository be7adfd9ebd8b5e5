//! Greedy daily scheduler.
//!
//! Places tasks into the earliest non-conflicting slot of a single day:
//! - Recurring commitments are seeded first and never bumped
//! - Existing bookings are loaded as opaque conflicts
//! - Tasks are visited by priority, highest first
//! - High-priority tasks try the chronotype's peak window before the full day
//! - Tasks with no slot go to the waitlist

mod chronotype;
mod placement;

pub use chronotype::{Chronotype, SearchWindow};
pub use placement::{Booking, BookingRecord, PlacedItem, Placement, Slot, TimeSpan};

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::clock::{hours_to_minutes, ClockTime};
use crate::conflict::ConflictIndex;
use crate::error::ScheduleError;
use crate::task::{RecurringCommitment, Task};
use crate::waitlist::Waitlist;

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Priority at or above which the peak window is searched first
    #[serde(default = "default_high_priority_threshold")]
    pub high_priority_threshold: f64,
    /// Reserved. Not consulted by placement.
    #[serde(default = "default_low_priority_threshold")]
    pub low_priority_threshold: f64,
    /// First hour of the full-day search window
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u32,
    /// Hour the full-day search window ends
    #[serde(default = "default_day_end_hour")]
    pub day_end_hour: u32,
}

fn default_high_priority_threshold() -> f64 {
    GreedyScheduler::HIGH_PRIORITY_THRESHOLD
}
fn default_low_priority_threshold() -> f64 {
    GreedyScheduler::LOW_PRIORITY_THRESHOLD
}
fn default_day_start_hour() -> u32 {
    6
}
fn default_day_end_hour() -> u32 {
    22
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            high_priority_threshold: default_high_priority_threshold(),
            low_priority_threshold: default_low_priority_threshold(),
            day_start_hour: default_day_start_hour(),
            day_end_hour: default_day_end_hour(),
        }
    }
}

impl SchedulerConfig {
    /// The full-day search window.
    pub fn day_window(&self) -> Result<SearchWindow, ScheduleError> {
        SearchWindow::new(self.day_start_hour, self.day_end_hour)
    }
}

/// What occupies an interval in the per-run conflict index.
#[derive(Debug, Clone)]
enum Occupant {
    Commitment,
    Booking,
    Task,
}

/// Result of one scheduling run.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleOutcome {
    pub date: NaiveDate,
    pub chronotype: Chronotype,
    /// Recurring commitments seeded before the run
    pub commitments: Vec<Placement>,
    /// Greedy task placements, in placement order
    pub placements: Vec<Placement>,
    /// Unplaced tasks, priority descending then input order
    pub waitlisted: Vec<Task>,
}

impl ScheduleOutcome {
    /// Commitments and task placements together, sorted by start time.
    pub fn timeline(&self) -> Vec<&Placement> {
        let mut all: Vec<&Placement> = self.commitments.iter().chain(&self.placements).collect();
        all.sort_by_key(|p| (p.start_time, p.end_time));
        all
    }
}

/// Greedy slot scheduler.
///
/// The conflict index and waitlist are built fresh inside every
/// [`schedule_tasks`](Self::schedule_tasks) call, so a shared `&GreedyScheduler`
/// can serve concurrent runs. Only the recurring commitments registered with
/// [`add_regular_task`](Self::add_regular_task) persist between runs.
#[derive(Debug, Clone)]
pub struct GreedyScheduler {
    config: SchedulerConfig,
    commitments: Vec<Placement>,
}

impl GreedyScheduler {
    pub const HIGH_PRIORITY_THRESHOLD: f64 = 7.0;
    pub const LOW_PRIORITY_THRESHOLD: f64 = 4.0;

    /// Create a new scheduler with default config
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            commitments: Vec::new(),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Commitments registered so far, dated as registered.
    pub fn commitments(&self) -> &[Placement] {
        &self.commitments
    }

    /// Register a recurring commitment at `start_time` for `length_hours`.
    ///
    /// The commitment is placed unconditionally: it is not checked against
    /// anything and is seeded into every later run until [`reset`](Self::reset).
    ///
    /// # Errors
    /// `InvalidDuration` for a non-positive length, `OutOfDay` if the
    /// commitment would run past 24:00.
    pub fn add_regular_task(
        &mut self,
        commitment: &RecurringCommitment,
        start_time: ClockTime,
        length_hours: f64,
        date: NaiveDate,
    ) -> Result<Placement, ScheduleError> {
        let minutes = hours_to_minutes(length_hours);
        if minutes == 0 {
            return Err(ScheduleError::InvalidDuration(format!(
                "commitment '{}' has length {length_hours} hours",
                commitment.name()
            )));
        }
        let end_time = start_time
            .checked_add_minutes(minutes)
            .ok_or_else(|| ScheduleError::OutOfDay {
                start: start_time.to_string(),
                minutes,
            })?;

        info!(
            commitment = commitment.name(),
            start = %start_time,
            end = %end_time,
            "adding regular task to schedule"
        );

        let placement = Placement::new(
            PlacedItem::Commitment(commitment.clone()),
            start_time,
            end_time,
            date,
        );
        self.commitments.push(placement.clone());
        Ok(placement)
    }

    /// Register a commitment at its own start time and length.
    pub fn add_commitment(
        &mut self,
        commitment: &RecurringCommitment,
        date: NaiveDate,
    ) -> Result<Placement, ScheduleError> {
        self.add_regular_task(commitment, commitment.start_time(), commitment.length(), date)
    }

    /// Drop every registered commitment.
    pub fn reset(&mut self) {
        self.commitments.clear();
    }

    /// Schedule `tasks` for `date`.
    ///
    /// # Arguments
    /// * `tasks` - Tasks to place; ties in priority keep input order
    /// * `chronotype` - Selects the peak window for high-priority tasks
    /// * `date` - Tag for the produced placements
    /// * `existing_bookings` - Calendar entries treated as fixed conflicts
    ///
    /// # Errors
    /// Only if the configured full-day window is invalid. Unplaceable tasks
    /// are a normal outcome and land in `waitlisted`.
    pub fn schedule_tasks<B: TimeSpan>(
        &self,
        tasks: &[Task],
        chronotype: Chronotype,
        date: NaiveDate,
        existing_bookings: &[B],
    ) -> Result<ScheduleOutcome, ScheduleError> {
        let day_window = self.config.day_window()?;
        let peak_window = chronotype.peak_window_or(day_window);

        info!(
            tasks = tasks.len(),
            %chronotype,
            peak = %peak_window,
            commitments = self.commitments.len(),
            bookings = existing_bookings.len(),
            "scheduling run started"
        );

        let mut index: ConflictIndex<Occupant> = ConflictIndex::new();
        let mut waitlist: Waitlist<Task> = Waitlist::new();

        // Commitments recur daily, so each run re-tags them with its own date.
        let commitments: Vec<Placement> = self
            .commitments
            .iter()
            .map(|c| Placement { date, ..c.clone() })
            .collect();
        for c in &commitments {
            index.insert(c.start_time.minutes(), c.end_time.minutes(), Occupant::Commitment);
        }
        for b in existing_bookings {
            index.insert(b.start_time().minutes(), b.end_time().minutes(), Occupant::Booking);
        }

        let mut sorted: Vec<&Task> = tasks.iter().collect();
        sorted.sort_by(|a, b| b.priority().total_cmp(&a.priority()));

        let mut placements: Vec<Placement> = Vec::new();

        for task in sorted {
            debug!(task = task.name(), priority = task.priority(), "processing task");

            let slot = if task.is_high_priority(self.config.high_priority_threshold) {
                find_earliest_slot(&index, task.length(), peak_window).or_else(|| {
                    debug!(task = task.name(), "peak window full, searching whole day");
                    find_earliest_slot(&index, task.length(), day_window)
                })
            } else {
                find_earliest_slot(&index, task.length(), day_window)
            };

            match slot {
                Some(slot) => {
                    debug!(task = task.name(), start = %slot.start, end = %slot.end, "slot found");
                    index.insert(slot.start.minutes(), slot.end.minutes(), Occupant::Task);
                    placements.push(Placement::new(
                        PlacedItem::Task(task.clone()),
                        slot.start,
                        slot.end,
                        date,
                    ));
                }
                None => {
                    debug!(task = task.name(), "no slot available, adding to waitlist");
                    waitlist.push(task.priority(), task.clone());
                }
            }
        }

        let waitlisted = waitlist.drain_ordered();

        info!(
            scheduled = placements.len(),
            waitlisted = waitlisted.len(),
            "scheduling run completed"
        );

        Ok(ScheduleOutcome {
            date,
            chronotype,
            commitments,
            placements,
            waitlisted,
        })
    }
}

impl Default for GreedyScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the earliest conflict-free slot of `length_hours` inside `window`.
///
/// Scans forward from the window start. On conflict the candidate jumps to
/// the latest end among the conflicting intervals. Returns `None` for a
/// non-positive duration, a duration longer than the window, or a full window.
pub fn find_earliest_slot<P: fmt::Debug>(
    index: &ConflictIndex<P>,
    length_hours: f64,
    window: SearchWindow,
) -> Option<Slot> {
    let duration = hours_to_minutes(length_hours);

    if duration == 0 {
        warn!(length_hours, "invalid task length");
        return None;
    }

    if duration > window.span_minutes() {
        warn!(length_hours, %window, "task too long for search window");
        return None;
    }

    let window_end = window.end_minutes();
    let mut current = window.start_minutes();

    while current + duration <= window_end {
        let conflicts = index.query_entries(current, current + duration);

        let Some(latest_end) = conflicts.iter().map(|(interval, _)| interval.end).max() else {
            // Both bounds are within the window, which is within the day.
            let start = ClockTime::from_minutes(current).ok()?;
            let end = ClockTime::from_minutes(current + duration).ok()?;
            return Some(Slot { start, end });
        };

        trace!(
            candidate = current,
            blocked_by = ?conflicts.iter().map(|(_, occupant)| occupant).collect::<Vec<_>>(),
            "candidate slot conflicts"
        );
        current = latest_end;
    }

    None
}
