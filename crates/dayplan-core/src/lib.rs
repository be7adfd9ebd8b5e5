//! # Dayplan Core Library
//!
//! This library provides the core scheduling logic for Dayplan, a greedy
//! daily planner. All operations are available via the standalone `dayplan`
//! CLI binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Priority**: Weighted scoring of effort, urgency and length on a 0-10 scale
//! - **Conflict index**: Augmented interval tree answering overlap queries
//! - **Waitlist**: Max-priority queue for tasks that found no slot
//! - **Scheduler**: Earliest-fit placement with chronotype peak windows
//! - **Breaks**: Pomodoro work/break segmentation of placements
//! - **History**: Frequency-based start time and duration prediction
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`GreedyScheduler`]: Places tasks into a single day
//! - [`ConflictIndex`]: Interval overlap index
//! - [`BreakInserter`]: Work/break segmentation
//! - [`Config`]: Application configuration management

pub mod breaks;
pub mod clock;
pub mod conflict;
pub mod error;
pub mod history;
pub mod priority;
pub mod scheduler;
pub mod storage;
pub mod task;
pub mod waitlist;

pub use breaks::{BreakConfig, BreakInserter, Segment, SegmentKind};
pub use clock::ClockTime;
pub use conflict::{ConflictIndex, Interval};
pub use error::{ConfigError, CoreError, Result, ScheduleError, ValidationError};
pub use history::{CompletionRecord, TimePredictor};
pub use priority::{calculate_priority, calculate_priority_with_weights, PriorityWeights};
pub use scheduler::{
    find_earliest_slot, Booking, Chronotype, GreedyScheduler, PlacedItem, Placement,
    ScheduleOutcome, SchedulerConfig, SearchWindow, Slot, TimeSpan,
};
pub use storage::Config;
pub use task::{RecurringCommitment, Task};
